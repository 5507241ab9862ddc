//! Round eligibility: may this student check into round N?
//!
//! Pure decision function over the job's rounds and the student's attendance
//! records; no I/O, no side effects.

use db::models::attendance_record::{self, Outcome};
use db::models::round;
use std::collections::HashMap;

/// Returns whether a student may check into the round at `target_position`.
///
/// Position 1 is unconditionally eligible. For any later round, every
/// non-retired round with a strictly smaller position must have an
/// attendance record whose outcome is not `failed`. Retired rounds are
/// skipped entirely.
///
/// Priors are walked in ascending position order; the conjunction is
/// commutative, so the sort only buys determinism when debugging.
pub fn is_eligible(
    target_position: i32,
    rounds: &[round::Model],
    attendance: &HashMap<i64, attendance_record::Model>,
) -> bool {
    if target_position <= 1 {
        return true;
    }

    let mut priors: Vec<&round::Model> = rounds
        .iter()
        .filter(|r| !r.retired && r.position < target_position)
        .collect();
    priors.sort_by_key(|r| r.position);

    priors.iter().all(|r| match attendance.get(&r.id) {
        Some(rec) => rec.outcome != Outcome::Failed,
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn round(id: i64, position: i32, retired: bool) -> round::Model {
        round::Model {
            id,
            job_id: 1,
            name: format!("Round {position}"),
            position,
            retired,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn record(round_id: i64, outcome: Outcome) -> attendance_record::Model {
        attendance_record::Model {
            student_id: 9,
            round_id,
            session_id: 1,
            confirmed_by: 2,
            outcome,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn first_round_is_always_eligible() {
        let rounds = vec![round(1, 1, false), round(2, 2, false)];
        assert!(is_eligible(1, &rounds, &HashMap::new()));

        // Even a failed record elsewhere changes nothing for round 1.
        let mut att = HashMap::new();
        att.insert(1, record(1, Outcome::Failed));
        assert!(is_eligible(1, &rounds, &att));
    }

    #[test]
    fn missing_prior_record_blocks() {
        let rounds = vec![round(1, 1, false), round(2, 2, false)];
        assert!(!is_eligible(2, &rounds, &HashMap::new()));
    }

    #[test]
    fn failed_prior_blocks() {
        let rounds = vec![round(1, 1, false), round(2, 2, false)];
        let mut att = HashMap::new();
        att.insert(1, record(1, Outcome::Failed));
        assert!(!is_eligible(2, &rounds, &att));
    }

    #[test]
    fn attended_priors_admit() {
        let rounds = vec![round(1, 1, false), round(2, 2, false), round(3, 3, false)];
        let mut att = HashMap::new();
        att.insert(1, record(1, Outcome::Attended));
        att.insert(2, record(2, Outcome::Attended));
        assert!(is_eligible(3, &rounds, &att));
    }

    #[test]
    fn retired_priors_are_skipped() {
        // Round at position 1 retired and never attended; position 2 attended.
        let rounds = vec![round(1, 1, true), round(2, 2, false), round(3, 3, false)];
        let mut att = HashMap::new();
        att.insert(2, record(2, Outcome::Attended));
        assert!(is_eligible(3, &rounds, &att));
    }

    #[test]
    fn any_single_gap_blocks() {
        let rounds = vec![round(1, 1, false), round(2, 2, false), round(3, 3, false)];
        let mut att = HashMap::new();
        att.insert(1, record(1, Outcome::Attended));
        // Position 2 unattended.
        assert!(!is_eligible(3, &rounds, &att));
    }
}
