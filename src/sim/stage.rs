//! Cleanup progress of the stage being played

use crate::error::TransitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Collecting,
    Cleaned,
}

impl StageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageState::Collecting => "collecting",
            StageState::Cleaned => "cleaned",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stage {
    index: usize,
    collected_refuse_count: usize,
    state: StageState,
}

impl Stage {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            collected_refuse_count: 0,
            state: StageState::Collecting,
        }
    }

    /// One capture animation finished
    pub fn record_collected(&mut self) {
        self.collected_refuse_count += 1;
    }

    /// Collecting -> Cleaned, once per stage
    pub fn mark_cleaned(&mut self) -> Result<(), TransitionError> {
        if self.state != StageState::Collecting {
            return Err(TransitionError {
                entity: "stage",
                from: self.state.as_str(),
                to: StageState::Cleaned.as_str(),
            }
            .raise());
        }
        self.state = StageState::Cleaned;
        Ok(())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn collected_refuse_count(&self) -> usize {
        self.collected_refuse_count
    }

    pub fn state(&self) -> StageState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_clean() {
        let mut stage = Stage::new(2);
        stage.record_collected();
        stage.record_collected();
        assert_eq!(stage.collected_refuse_count(), 2);
        assert_eq!(stage.state(), StageState::Collecting);

        stage.mark_cleaned().unwrap();
        assert_eq!(stage.state(), StageState::Cleaned);
        assert_eq!(stage.index(), 2);
    }

    #[test]
    #[cfg_attr(
        debug_assertions,
        should_panic(expected = "illegal stage transition: cleaned -> cleaned")
    )]
    fn test_mark_cleaned_twice_is_rejected() {
        let mut stage = Stage::new(0);
        stage.mark_cleaned().unwrap();
        assert!(stage.mark_cleaned().is_err());
        assert_eq!(stage.state(), StageState::Cleaned);
    }
}
