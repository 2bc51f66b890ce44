use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic name cannot be empty")]
    EmptyName,

    #[error("topic {name:?} has no questions")]
    NoQuestions { name: String },

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question {prompt:?} needs at least two answer options")]
    TooFewOptions { prompt: String },

    #[error("question {prompt:?} lists the same option twice")]
    DuplicateOption { prompt: String },

    #[error("correct answer for {prompt:?} is not one of its options")]
    CorrectAnswerNotAnOption { prompt: String },

    #[error("topic {name:?} repeats question {prompt:?}")]
    DuplicateQuestion { name: String, prompt: String },

    #[error("catalog lists topic {name:?} twice")]
    DuplicateTopic { name: String },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One multiple-choice question with a fixed option order and a single
/// correct answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct: String,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `TopicError` if the prompt is empty, fewer than two options are
    /// given, an option repeats, or the correct answer is not an option.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: impl Into<String>,
    ) -> Result<Self, TopicError> {
        let prompt = prompt.into();
        let correct = correct.into();

        if prompt.trim().is_empty() {
            return Err(TopicError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(TopicError::TooFewOptions { prompt });
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(TopicError::DuplicateOption { prompt });
            }
        }
        if !options.contains(&correct) {
            return Err(TopicError::CorrectAnswerNotAnOption { prompt });
        }

        Ok(Self {
            prompt,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> &str {
        &self.correct
    }

    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct == option
    }
}

/// Unvalidated question shape, e.g. decoded from a JSON question bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: String,
}

impl QuestionDraft {
    /// Validates the draft into a `Question`.
    ///
    /// # Errors
    ///
    /// Returns `TopicError` under the same rules as `Question::new`.
    pub fn validate(self) -> Result<Question, TopicError> {
        Question::new(self.prompt, self.options, self.correct)
    }
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// A named subject area with an explicitly ordered question list.
///
/// Question sequencing follows the order of `questions`; there is no reliance
/// on map iteration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    name: String,
    description: String,
    questions: Vec<Question>,
}

impl Topic {
    /// Creates a validated topic.
    ///
    /// # Errors
    ///
    /// Returns `TopicError` if the name is empty, no questions are given, or
    /// a question prompt repeats within the topic.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, TopicError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TopicError::EmptyName);
        }
        if questions.is_empty() {
            return Err(TopicError::NoQuestions { name });
        }
        for (i, question) in questions.iter().enumerate() {
            if questions[..i].iter().any(|q| q.prompt == question.prompt) {
                return Err(TopicError::DuplicateQuestion {
                    name,
                    prompt: question.prompt.clone(),
                });
            }
        }

        Ok(Self {
            name,
            description: description.into(),
            questions,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Questions in quiz order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

/// Unvalidated topic shape, e.g. decoded from a JSON question bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDraft {
    pub name: String,
    pub description: String,
    pub questions: Vec<QuestionDraft>,
}

impl TopicDraft {
    /// Validates the draft into a `Topic`.
    ///
    /// # Errors
    ///
    /// Returns `TopicError` if the topic or any question fails validation.
    pub fn validate(self) -> Result<Topic, TopicError> {
        let questions = self
            .questions
            .into_iter()
            .map(QuestionDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Topic::new(self.name, self.description, questions)
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Immutable, validated collection of topics, constructed once at startup.
///
/// A malformed topic fails here, at load time, never during a running quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    topics: Vec<Topic>,
}

impl Catalog {
    /// Creates a catalog from validated topics.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::DuplicateTopic` if two topics share a name.
    pub fn new(topics: Vec<Topic>) -> Result<Self, TopicError> {
        for (i, topic) in topics.iter().enumerate() {
            if topics[..i].iter().any(|t| t.name == topic.name) {
                return Err(TopicError::DuplicateTopic {
                    name: topic.name.clone(),
                });
            }
        }
        Ok(Self { topics })
    }

    /// Validates a list of drafts into a catalog.
    ///
    /// # Errors
    ///
    /// Returns the first `TopicError` encountered.
    pub fn from_drafts(drafts: Vec<TopicDraft>) -> Result<Self, TopicError> {
        let topics = drafts
            .into_iter()
            .map(TopicDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(topics)
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// The built-in operating-systems question bank.
    ///
    /// # Errors
    ///
    /// Returns `TopicError` if the bank is malformed; this is a configuration
    /// error and should abort startup.
    pub fn operating_systems() -> Result<Self, TopicError> {
        let process = Topic::new(
            "Process",
            "Programs in execution, their lifecycle and states.",
            vec![
                Question::new(
                    "What is a process?",
                    vec![
                        "A program in execution".into(),
                        "A stored file".into(),
                        "A network request".into(),
                        "A hardware device".into(),
                    ],
                    "A program in execution",
                )?,
                Question::new(
                    "Which state does a process enter while waiting for I/O?",
                    vec![
                        "Running".into(),
                        "Blocked".into(),
                        "Ready".into(),
                        "Terminated".into(),
                    ],
                    "Blocked",
                )?,
            ],
        )?;

        let memory = Topic::new(
            "Memory",
            "Virtual memory, paging, and address translation.",
            vec![
                Question::new(
                    "What is virtual memory?",
                    vec![
                        "A memory management technique".into(),
                        "A physical memory module".into(),
                        "A storage disk".into(),
                        "A network protocol".into(),
                    ],
                    "A memory management technique",
                )?,
                Question::new(
                    "What maps virtual addresses to physical frames?",
                    vec![
                        "Page table".into(),
                        "Inode table".into(),
                        "Routing table".into(),
                        "Symbol table".into(),
                    ],
                    "Page table",
                )?,
                Question::new(
                    "What happens on a page fault?",
                    vec![
                        "The missing page is loaded from backing store".into(),
                        "The process is always killed".into(),
                        "The CPU halts".into(),
                        "Memory is wiped".into(),
                    ],
                    "The missing page is loaded from backing store",
                )?,
            ],
        )?;

        let kernel = Topic::new(
            "Kernel",
            "The core of the operating system and its privileges.",
            vec![
                Question::new(
                    "What runs in the most privileged CPU mode?",
                    vec![
                        "The kernel".into(),
                        "A text editor".into(),
                        "The window manager".into(),
                        "A shell script".into(),
                    ],
                    "The kernel",
                )?,
                Question::new(
                    "How does a user program request a kernel service?",
                    vec![
                        "System call".into(),
                        "Function pointer".into(),
                        "Environment variable".into(),
                        "Signal handler".into(),
                    ],
                    "System call",
                )?,
            ],
        )?;

        let scheduling = Topic::new(
            "Scheduling",
            "How the CPU is shared between runnable processes.",
            vec![
                Question::new(
                    "Which scheduling policy can starve long jobs?",
                    vec![
                        "Shortest job first".into(),
                        "Round robin".into(),
                        "First come first served".into(),
                        "Lottery scheduling".into(),
                    ],
                    "Shortest job first",
                )?,
                Question::new(
                    "What is a context switch?",
                    vec![
                        "Saving one process state and restoring another".into(),
                        "Rebooting the machine".into(),
                        "Swapping memory to disk".into(),
                        "Changing terminal focus".into(),
                    ],
                    "Saving one process state and restoring another",
                )?,
            ],
        )?;

        Self::new(vec![process, memory, kernel, scheduling])
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
