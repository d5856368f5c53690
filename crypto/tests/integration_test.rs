use rand::Rng;

use std::sync::Arc;

use crypto::{
    CbcProcessor,
    CipherBlock,
    KeyedCipher,
    SymmetricCipher,
    Threefish256,
};

#[test]
fn decrypt_encrypt_same_value() {
    let mut rng = rand::thread_rng();

    for _ in 0..100 {
        let tweak: Vec<u8> = (0..16).map(|_| rng.gen()).collect();
        let key: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
        let iv: Vec<u8> = (0..32).map(|_| rng.gen()).collect();

        let cipher = Threefish256::new(&key, &tweak).unwrap();
        let block: Arc<dyn CipherBlock> = Arc::new(cipher);

        let processor = CbcProcessor::new(block);

        let plaintext_length = rng.gen_range(0..2000);
        let plaintext1: Vec<u8> = (0..plaintext_length).map(|_| rng.gen()).collect();

        let ciphertext = processor.encrypt_blocks(&iv, &plaintext1).unwrap();
        let plaintext2 = processor.decrypt_blocks(&ciphertext).unwrap();

        assert_eq!(plaintext1, plaintext2);
    }
}

#[test]
fn symmetric_cipher_decrypt_encrypt() {
    let mut rng = rand::thread_rng();

    let cipher: Arc<dyn SymmetricCipher> = Arc::new(KeyedCipher::new());

    for _ in 0..100 {
        let key_length = rng.gen_range(1..64);
        let key: Vec<u8> = (0..key_length).map(|_| rng.gen()).collect();

        let plaintext_length = rng.gen_range(100..2000);
        let plaintext1: Vec<u8> = (0..plaintext_length).map(|_| rng.gen()).collect();

        let ciphertext = cipher.encrypt(&plaintext1, &key).unwrap();
        assert_eq!(ciphertext.len() % 32, 0);

        let plaintext2 = cipher.decrypt(&ciphertext, &key).unwrap();
        assert_eq!(plaintext1, plaintext2);
    }
}
