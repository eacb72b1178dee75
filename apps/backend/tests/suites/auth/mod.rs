mod identity_verifier;
mod session;
