//! Stateless validation of staking transactions.
//!
//! Stateful checks (balances, whether a lock was already released, whether
//! the target agent exists) belong to the ledger.

use poc_types::{Address, ConsensusParams, Na};

use crate::account::Delegate;
use crate::agent::Agent;
use crate::error::TransactionError;
use crate::staking::{SignedTransaction, TxData};

pub fn validate_deposit(deposit: Na, minimum: Na) -> Result<(), TransactionError> {
    if deposit.is_zero() {
        return Err(TransactionError::ZeroDeposit);
    }
    if deposit < minimum {
        return Err(TransactionError::DepositBelowMinimum { deposit, minimum });
    }
    Ok(())
}

/// Check an agent registration payload against the consensus parameters.
pub fn validate_agent(agent: &Agent, params: &ConsensusParams) -> Result<(), TransactionError> {
    validate_deposit(agent.deposit, params.min_agent_deposit)?;
    if agent.delegate_address.is_empty() {
        return Err(TransactionError::EmptyDelegateAddress);
    }
    if !agent.commission_rate.is_finite() || !(0.0..=1.0).contains(&agent.commission_rate) {
        return Err(TransactionError::InvalidCommissionRate(agent.commission_rate));
    }
    if agent.introduction.len() > params.max_introduction_len {
        return Err(TransactionError::IntroductionTooLong {
            len: agent.introduction.len(),
            max: params.max_introduction_len,
        });
    }
    Ok(())
}

pub fn validate_delegation(
    delegate: &Delegate,
    params: &ConsensusParams,
) -> Result<(), TransactionError> {
    validate_deposit(delegate.deposit, params.min_delegate_deposit)?;
    if delegate.delegate_address.is_empty() {
        return Err(TransactionError::EmptyDelegateAddress);
    }
    Ok(())
}

fn check_owner(owner: &Address, found: &Address) -> Result<(), TransactionError> {
    if owner != found {
        return Err(TransactionError::OwnerMismatch {
            owner: owner.clone(),
            found: found.clone(),
        });
    }
    Ok(())
}

fn check_amount(declared: Na, locked: Na) -> Result<(), TransactionError> {
    if declared != locked {
        return Err(TransactionError::AmountMismatch { declared, locked });
    }
    Ok(())
}

/// Validate payload, sub-transaction consistency and signature.
pub fn validate_staking_tx(
    tx: &SignedTransaction,
    params: &ConsensusParams,
) -> Result<(), TransactionError> {
    match tx.data() {
        TxData::RegisterAgent(data) => {
            validate_agent(&data.agent, params)?;
            check_amount(data.agent.deposit, data.lock.amount())?;
            check_owner(&data.address, data.lock.address())?;
        }
        TxData::JoinConsensus(data) => {
            let delegate = data.delegate().ok_or_else(|| {
                TransactionError::InvalidPayload("join must carry a delegate".into())
            })?;
            validate_delegation(delegate, params)?;
            check_amount(delegate.deposit, data.lock.amount())?;
            check_owner(&data.account.address, data.lock.address())?;
        }
        TxData::ExitConsensus(data) => {
            if data.join_tx_hash.is_zero() {
                return Err(TransactionError::InvalidPayload(
                    "exit must reference a join transaction".into(),
                ));
            }
            check_owner(&data.address, data.unlock.address())?;
        }
    }
    tx.verify()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::{LockTransaction, UnlockTransaction};
    use crate::staking::{
        ExitConsensusData, JoinConsensusData, RegisterAgentData, TxSignature, UnsignedTransaction,
    };
    use poc_crypto::{derive_address, keypair_from_seed, sign_message};
    use poc_types::{KeyPair, Timestamp, TxHash};

    fn params() -> ConsensusParams {
        ConsensusParams::dev()
    }

    fn owner() -> (KeyPair, Address) {
        let kp = keypair_from_seed(&[21u8; 32]);
        let address = derive_address(&kp.public);
        (kp, address)
    }

    fn signed(data: TxData, kp: &KeyPair) -> SignedTransaction {
        let sealed = UnsignedTransaction::new(Timestamp::new(50), Na::ZERO, data)
            .seal()
            .unwrap();
        let signature = sign_message(sealed.hash().as_bytes(), &kp.private);
        sealed.into_signed(TxSignature {
            public_key: kp.public.clone(),
            signature,
        })
    }

    fn lock(address: &Address, amount: u64) -> LockTransaction {
        LockTransaction::new(address.clone(), Na::new(amount), Timestamp::new(50), 0).unwrap()
    }

    #[test]
    fn zero_deposit_rejected() {
        assert!(matches!(
            validate_deposit(Na::ZERO, Na::new(1)),
            Err(TransactionError::ZeroDeposit)
        ));
    }

    #[test]
    fn deposit_below_minimum_rejected() {
        assert!(matches!(
            validate_deposit(Na::new(5), Na::new(10)),
            Err(TransactionError::DepositBelowMinimum { .. })
        ));
    }

    #[test]
    fn commission_rate_bounds() {
        let p = params();
        for rate in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let agent = Agent::new(Na::new(1), "poc_a", rate, "");
            assert!(matches!(
                validate_agent(&agent, &p),
                Err(TransactionError::InvalidCommissionRate(_))
            ));
        }
        for rate in [0.0, 0.5, 1.0] {
            validate_agent(&Agent::new(Na::new(1), "poc_a", rate, ""), &p).unwrap();
        }
    }

    #[test]
    fn introduction_length_bounded() {
        let p = params();
        let agent = Agent::new(Na::new(1), "poc_a", 0.1, "x".repeat(p.max_introduction_len + 1));
        assert!(matches!(
            validate_agent(&agent, &p),
            Err(TransactionError::IntroductionTooLong { .. })
        ));
    }

    #[test]
    fn valid_register_passes() {
        let (kp, address) = owner();
        let data = TxData::RegisterAgent(RegisterAgentData {
            address: address.clone(),
            agent: Agent::new(Na::new(100), "poc_packer", 0.2, "agent"),
            lock: lock(&address, 100),
        });
        validate_staking_tx(&signed(data, &kp), &params()).unwrap();
    }

    #[test]
    fn lock_amount_must_match_deposit() {
        let (kp, address) = owner();
        let data = TxData::JoinConsensus(JoinConsensusData::new(
            address.clone(),
            Delegate::new("poc_agent", Na::new(100)),
            lock(&address, 99),
        ));
        assert!(matches!(
            validate_staking_tx(&signed(data, &kp), &params()),
            Err(TransactionError::AmountMismatch { .. })
        ));
    }

    #[test]
    fn lock_owned_by_someone_else_rejected() {
        let (kp, address) = owner();
        let stranger = Address::parse("poc_stranger").unwrap();
        let data = TxData::JoinConsensus(JoinConsensusData::new(
            address,
            Delegate::new("poc_agent", Na::new(100)),
            lock(&stranger, 100),
        ));
        assert!(matches!(
            validate_staking_tx(&signed(data, &kp), &params()),
            Err(TransactionError::OwnerMismatch { .. })
        ));
    }

    #[test]
    fn exit_requires_join_reference() {
        let (kp, address) = owner();
        let unlock = UnlockTransaction::for_lock(&lock(&address, 10), Timestamp::new(60)).unwrap();
        let data = TxData::ExitConsensus(ExitConsensusData {
            address,
            join_tx_hash: TxHash::ZERO,
            unlock,
        });
        assert!(matches!(
            validate_staking_tx(&signed(data, &kp), &params()),
            Err(TransactionError::InvalidPayload(_))
        ));
    }
}
