use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sign_tx_hash_bench(c: &mut Criterion) {
    let kp = poc_crypto::generate_keypair();
    let hash = poc_crypto::hash_transaction(&[42u8; 256]);

    c.bench_function("ed25519_sign_tx_hash", |b| {
        b.iter(|| poc_crypto::sign_message(black_box(hash.as_bytes()), &kp.private))
    });
}

fn verify_tx_hash_bench(c: &mut Criterion) {
    let kp = poc_crypto::generate_keypair();
    let hash = poc_crypto::hash_transaction(&[42u8; 256]);
    let sig = poc_crypto::sign_message(hash.as_bytes(), &kp.private);

    c.bench_function("ed25519_verify_tx_hash", |b| {
        b.iter(|| poc_crypto::verify_signature(black_box(hash.as_bytes()), &sig, &kp.public))
    });
}

fn hash_transaction_bench(c: &mut Criterion) {
    let tx_bytes = vec![0xCDu8; 512];

    c.bench_function("hash_transaction_512B", |b| {
        b.iter(|| poc_crypto::hash_transaction(black_box(&tx_bytes)))
    });
}

fn derive_address_bench(c: &mut Criterion) {
    let kp = poc_crypto::keypair_from_seed(&[5u8; 32]);

    c.bench_function("derive_address", |b| {
        b.iter(|| poc_crypto::derive_address(black_box(&kp.public)))
    });
}

criterion_group!(
    benches,
    sign_tx_hash_bench,
    verify_tx_hash_bench,
    hash_transaction_bench,
    derive_address_bench,
);
criterion_main!(benches);
