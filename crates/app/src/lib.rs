use battle::BattleOutcome;

pub mod app_loop;
pub mod launch;

pub const APP_NAME: &str = "Soul Link";

/// Format a snapshot hash as `0x` followed by exactly 16 lowercase hex digits.
pub fn format_snapshot_hash(hash: u64) -> String {
    format!("0x{hash:016x}")
}

/// Short code shown on the end-of-battle recap.
pub fn outcome_code(outcome: BattleOutcome) -> &'static str {
    match outcome {
        BattleOutcome::Killed => "WIN_KILLED",
        BattleOutcome::Spared => "WIN_SPARED",
        BattleOutcome::Died => "LOSS_HP_ZERO",
    }
}
