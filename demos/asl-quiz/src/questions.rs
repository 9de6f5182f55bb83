use serde::Deserialize;

/// Errors raised while loading the question document.
#[derive(thiserror::Error, Debug)]
pub enum QuestionError {
    #[error("question document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("question document has no questions")]
    Empty,

    #[error("question #{index}: word is empty")]
    EmptyWord { index: usize },

    #[error("question #{index}: answer is empty")]
    EmptyAnswer { index: usize },

    #[error("question #{index}: answer '{answer}' does not occur in '{word}'")]
    AnswerNotInWord { index: usize, word: String, answer: String },

    #[error("question #{index}: scale must be positive, got {scale}")]
    BadScale { index: usize, scale: f32 },
}

/// One quiz item: spell `word` with the `answer` letter signed by hand.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Question {
    pub word: String,
    pub answer: String,
    /// Model path, resolved by the host.
    pub model: String,
    /// Extra factor on top of the normalized model size.
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

/// Byte range of the first case-insensitive occurrence of `needle` in `haystack`.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    for (start, _) in haystack.char_indices() {
        let mut rest = haystack[start..].char_indices();
        let mut end = start;
        let matched = needle.chars().all(|n| match rest.next() {
            Some((offset, h)) if h.to_lowercase().eq(n.to_lowercase()) => {
                end = start + offset + h.len_utf8();
                true
            }
            _ => false,
        });
        if matched {
            return Some((start, end));
        }
    }
    None
}

impl Question {
    /// The word with the answer blanked out: "lamp" / "a" → "l_mp".
    pub fn prompt(&self) -> String {
        match find_ignore_case(&self.word, &self.answer) {
            Some((start, end)) => format!("{}_{}", &self.word[..start], &self.word[end..]),
            None => self.word.clone(),
        }
    }

    /// Pose library name of the answer letter.
    pub fn pose_name(&self) -> String {
        format!("asl {}", self.answer.to_lowercase())
    }

    fn validate(&self, index: usize) -> Result<(), QuestionError> {
        if self.word.trim().is_empty() {
            return Err(QuestionError::EmptyWord { index });
        }
        if self.answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer { index });
        }
        if find_ignore_case(&self.word, &self.answer).is_none() {
            return Err(QuestionError::AnswerNotInWord {
                index,
                word: self.word.clone(),
                answer: self.answer.clone(),
            });
        }
        if !(self.scale > 0.0) || !self.scale.is_finite() {
            return Err(QuestionError::BadScale { index, scale: self.scale });
        }
        Ok(())
    }
}

/// Ordered, validated list of questions.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn from_json(json: &str) -> Result<Self, QuestionError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::Empty);
        }
        for (index, question) in questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(Self { questions })
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
