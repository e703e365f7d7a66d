// src/bin/generate_document_key.rs
//! Print a fresh random document key for `keys.document_key` / `PDV_DOCUMENT_KEY`

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use patient_document_vault::consts::BASE64_KEY_PREFIX;
use patient_document_vault::DocumentKey32;
use rand::RngCore;

fn main() {
    let mut raw = [0u8; 32];
    rand::rng().fill_bytes(&mut raw);
    let key = DocumentKey32::new(raw);

    println!("{BASE64_KEY_PREFIX}{}", STANDARD.encode(key.expose_secret()));
    eprintln!("Store this key safely: losing it makes every stored document unrecoverable.");
}
