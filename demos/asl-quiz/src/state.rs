/// Quiz phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Waiting for an anchor and the question document.
    Start,
    /// A question model is being fetched or animated in.
    Loading,
    /// The listener is armed for the current question.
    Answering,
    End,
    /// A model failed to load; terminal.
    LoadFailed,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::End | GameState::LoadFailed)
    }

    /// Numeric code sent to the host with the state-changed event.
    pub fn code(self) -> f32 {
        match self {
            GameState::Start => 0.0,
            GameState::Loading => 1.0,
            GameState::Answering => 2.0,
            GameState::End => 3.0,
            GameState::LoadFailed => 4.0,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("cannot {action} while {from:?}")]
pub struct TransitionError {
    pub from: GameState,
    pub action: &'static str,
}

/// The quiz's single source of truth for phase and progress.
/// Only forward transitions exist; `Loading ↔ Answering` alternates once per
/// question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    state: GameState,
    question_index: usize,
    total: usize,
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            state: GameState::Start,
            question_index: 0,
            total: 0,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn require(&self, state: GameState, action: &'static str) -> Result<(), TransitionError> {
        if self.state == state {
            Ok(())
        } else {
            Err(TransitionError { from: self.state, action })
        }
    }

    fn enter(&mut self, next: GameState) -> GameState {
        log::info!(
            "quiz: {:?} -> {:?} (question {}/{})",
            self.state,
            next,
            self.question_index + 1,
            self.total
        );
        self.state = next;
        next
    }

    /// START → LOADING for the first of `total` questions.
    pub fn begin(&mut self, total: usize) -> Result<GameState, TransitionError> {
        self.require(GameState::Start, "begin")?;
        if total == 0 {
            return Err(TransitionError { from: self.state, action: "begin without questions" });
        }
        self.total = total;
        self.question_index = 0;
        Ok(self.enter(GameState::Loading))
    }

    /// LOADING → ANSWERING once the model is in place.
    pub fn loaded(&mut self) -> Result<GameState, TransitionError> {
        self.require(GameState::Loading, "finish loading")?;
        Ok(self.enter(GameState::Answering))
    }

    /// ANSWERING → LOADING (next question) or END (that was the last one).
    pub fn answered(&mut self) -> Result<GameState, TransitionError> {
        self.require(GameState::Answering, "answer")?;
        self.question_index += 1;
        if self.question_index >= self.total {
            self.question_index = self.total;
            Ok(self.enter(GameState::End))
        } else {
            Ok(self.enter(GameState::Loading))
        }
    }

    /// LOADING → LOAD_FAILED.
    pub fn failed(&mut self) -> Result<GameState, TransitionError> {
        self.require(GameState::Loading, "fail loading")?;
        Ok(self.enter(GameState::LoadFailed))
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_question_loads_then_answers_once() {
        let total = 4;
        let mut s = QuizSession::new();
        assert_eq!(s.begin(total), Ok(GameState::Loading));

        for i in 0..total {
            assert_eq!(s.question_index(), i);
            assert_eq!(s.loaded(), Ok(GameState::Answering));
            assert!(s.loaded().is_err());
            let next = s.answered().unwrap();
            assert_eq!(s.question_index(), i + 1);
            if i + 1 < total {
                assert_eq!(next, GameState::Loading);
            } else {
                assert_eq!(next, GameState::End);
            }
        }
        assert!(s.state().is_terminal());
        assert_eq!(s.question_index(), total);
    }

    #[test]
    fn last_question_ends_instead_of_loading() {
        let mut s = QuizSession::new();
        s.begin(1).unwrap();
        s.loaded().unwrap();
        assert_eq!(s.answered(), Ok(GameState::End));
    }

    #[test]
    fn no_backward_or_skipping_transitions() {
        let mut s = QuizSession::new();
        assert!(s.loaded().is_err());
        assert!(s.answered().is_err());
        assert!(s.begin(0).is_err());
        s.begin(2).unwrap();
        assert!(s.begin(2).is_err());
        assert!(s.answered().is_err());
        assert_eq!(s.failed(), Ok(GameState::LoadFailed));
        assert!(s.loaded().is_err());
        assert!(s.answered().is_err());
        assert_eq!(s.state(), GameState::LoadFailed);
    }
}
