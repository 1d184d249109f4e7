use criterion::{black_box, criterion_group, criterion_main, Criterion};
use poc_crypto::{derive_address, keypair_from_seed, sign_message};
use poc_protocol::WireCodec;
use poc_transactions::{
    Agent, LockTransaction, RegisterAgentData, SignedTransaction, TxData, TxSignature,
    UnsignedTransaction,
};
use poc_types::{Na, Timestamp};

fn signed_registration() -> SignedTransaction {
    let kp = keypair_from_seed(&[3u8; 32]);
    let owner = derive_address(&kp.public);
    let deposit = Na::new(20_000 * poc_types::NA_PER_COIN);
    let time = Timestamp::new(1_700_000_000);
    let lock = LockTransaction::new(owner.clone(), deposit, time, 7).unwrap();
    let agent = Agent::new(
        deposit,
        "poc_packer_address",
        0.1,
        "a reliable block producer since genesis",
    );
    let data = TxData::RegisterAgent(RegisterAgentData {
        address: owner,
        agent,
        lock,
    });
    let sealed = UnsignedTransaction::new(Timestamp::new(1_700_000_000), Na::new(1_000_000), data)
        .seal()
        .unwrap();
    let signature = TxSignature {
        public_key: kp.public.clone(),
        signature: sign_message(sealed.hash().as_bytes(), &kp.private),
    };
    sealed.into_signed(signature)
}

fn encode_bench(c: &mut Criterion) {
    let tx = signed_registration();

    c.bench_function("encode_register_agent", |b| {
        b.iter(|| black_box(&tx).to_bytes().unwrap())
    });
}

fn decode_bench(c: &mut Criterion) {
    let bytes = signed_registration().to_bytes().unwrap();

    c.bench_function("decode_register_agent", |b| {
        b.iter(|| SignedTransaction::from_bytes(black_box(&bytes)).unwrap())
    });
}

fn seal_bench(c: &mut Criterion) {
    let tx = signed_registration();
    let unsigned = UnsignedTransaction::new(tx.time(), tx.fee(), tx.data().clone());

    c.bench_function("seal_register_agent", |b| {
        b.iter(|| black_box(unsigned.clone()).seal().unwrap())
    });
}

fn verify_bench(c: &mut Criterion) {
    let tx = signed_registration();

    c.bench_function("verify_register_agent", |b| b.iter(|| black_box(&tx).verify().unwrap()));
}

criterion_group!(benches, encode_bench, decode_bench, seal_bench, verify_bench);
criterion_main!(benches);
