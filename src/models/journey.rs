//! Customer journey progress indicator
//!
//! Pure display logic: the four steps a guest goes through and how far a
//! reservation's current status has come. Nothing here restricts which
//! status a reservation may move to.

use serde::Serialize;

use super::reservation::ReservationStatus;

const STEP_LABELS: [&str; 4] = ["Booked", "Confirmed", "Checked in", "Checked out"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneyStep {
    pub label: &'static str,
    pub completed: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journey {
    /// 1-based index of the reached step; 0 when the journey was cancelled
    pub current_step: usize,
    pub total_steps: usize,
    pub percent: u8,
    pub cancelled: bool,
    pub steps: Vec<JourneyStep>,
}

impl Journey {
    pub fn for_status(status: ReservationStatus) -> Self {
        let current_step = match status {
            ReservationStatus::Pending => 1,
            ReservationStatus::Confirmed => 2,
            ReservationStatus::CheckedIn => 3,
            ReservationStatus::CheckedOut => 4,
            ReservationStatus::Cancelled => 0,
        };
        let total_steps = STEP_LABELS.len();

        let steps = STEP_LABELS
            .iter()
            .enumerate()
            .map(|(index, &label)| {
                let position = index + 1;
                JourneyStep {
                    label,
                    completed: position < current_step,
                    active: position == current_step,
                }
            })
            .collect();

        Self {
            current_step,
            total_steps,
            percent: (current_step * 100 / total_steps) as u8,
            cancelled: status == ReservationStatus::Cancelled,
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_is_first_step() {
        let journey = Journey::for_status(ReservationStatus::Pending);
        assert_eq!(journey.current_step, 1);
        assert_eq!(journey.percent, 25);
        assert!(journey.steps[0].active);
        assert!(!journey.steps[0].completed);
        assert!(!journey.cancelled);
    }

    #[test]
    fn test_checked_in_completes_earlier_steps() {
        let journey = Journey::for_status(ReservationStatus::CheckedIn);
        assert_eq!(journey.percent, 75);
        let completed: Vec<_> = journey.steps.iter().map(|s| s.completed).collect();
        assert_eq!(completed, vec![true, true, false, false]);
        assert!(journey.steps[2].active);
    }

    #[test]
    fn test_checked_out_is_complete() {
        let journey = Journey::for_status(ReservationStatus::CheckedOut);
        assert_eq!(journey.percent, 100);
        assert!(journey.steps[3].active);
        assert_eq!(journey.steps.iter().filter(|s| s.completed).count(), 3);
    }

    #[test]
    fn test_cancelled_halts_journey() {
        let journey = Journey::for_status(ReservationStatus::Cancelled);
        assert!(journey.cancelled);
        assert_eq!(journey.current_step, 0);
        assert_eq!(journey.percent, 0);
        assert!(journey.steps.iter().all(|s| !s.active && !s.completed));
    }
}
