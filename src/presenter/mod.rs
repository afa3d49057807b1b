//! Winner presentation
//!
//! Tracks what the result modal shows and which follow-up the user picked.
//! The DOM side (`dom`, browser only) just mirrors this state.

pub mod confetti;
#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use confetti::{ConfettiPiece, burst_lifetime, confetti_burst};
#[cfg(target_arch = "wasm32")]
pub use dom::DomPresenter;

use rand::Rng;

/// Follow-up actions offered by the result modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterAction {
    /// Close the modal, keep the winner on the wheel
    Dismiss,
    /// Take the winner off the wheel, then close
    RemoveWinner,
    /// Close and spin straight away
    SpinAgain,
}

/// Result modal state
#[derive(Debug, Clone, Default)]
pub struct ResultPresenter {
    winner: Option<String>,
    confetti: Vec<ConfettiPiece>,
    /// Incremented per burst so the DOM knows to replace old pieces
    burst_id: u32,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a winner and fire a fresh burst, replacing any previous one
    pub fn show<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R, confetti_count: usize) {
        log::info!("Winner: {}", name);
        self.winner = Some(name.to_string());
        self.confetti = confetti_burst(rng, confetti_count);
        self.burst_id = self.burst_id.wrapping_add(1);
    }

    /// Close the modal. The burst is left to finish on its own.
    pub fn dismiss(&mut self) -> Option<String> {
        self.winner.take()
    }

    pub fn is_visible(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn confetti(&self) -> &[ConfettiPiece] {
        &self.confetti
    }

    pub fn burst_id(&self) -> u32 {
        self.burst_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_show_and_dismiss() {
        let mut presenter = ResultPresenter::new();
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(!presenter.is_visible());

        presenter.show("Bob", &mut rng, 50);
        assert!(presenter.is_visible());
        assert_eq!(presenter.winner(), Some("Bob"));
        assert_eq!(presenter.confetti().len(), 50);

        assert_eq!(presenter.dismiss(), Some("Bob".to_string()));
        assert!(!presenter.is_visible());
        assert_eq!(presenter.dismiss(), None);
    }

    #[test]
    fn test_next_burst_replaces_previous() {
        let mut presenter = ResultPresenter::new();
        let mut rng = Pcg32::seed_from_u64(4);
        presenter.show("A", &mut rng, 30);
        let first = presenter.burst_id();
        let first_pieces = presenter.confetti().to_vec();

        presenter.show("B", &mut rng, 10);
        assert_ne!(presenter.burst_id(), first);
        assert_eq!(presenter.confetti().len(), 10);
        assert_ne!(presenter.confetti(), &first_pieces[..10]);
    }
}
