//! `parley gen-secret`: print a new token signing secret.

use parley_infra::crypto::token::generate_secret;

/// Print a fresh 32-byte hex secret and the `.env` line that uses it.
pub fn gen_secret() {
    let secret = generate_secret();
    println!("Generated JWT secret: {secret}");
    println!("Add this to your .env file as:");
    println!("JWT_SECRET={secret}");
}
