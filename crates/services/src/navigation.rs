/// Named screens of the single-window app.
///
/// Screens that operate on a topic carry its name, so a screen can never be
/// shown without the data it needs. Using an enum (instead of comparing
/// strings against literals) makes an unmatched screen unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login,
    Home,
    DailyQuestion,
    TopicDetail { topic: String },
    Quiz { topic: String },
    EndPage,
    Leaderboard,
    Badges,
    Profile,
}

/// Flat screen selector: one mutable current screen, no history stack.
///
/// "Back" targets are hardcoded per screen rather than popped from a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationController {
    current: Screen,
}

impl NavigationController {
    /// Starts at the login gate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Screen::Login,
        }
    }

    #[must_use]
    pub fn current(&self) -> &Screen {
        &self.current
    }

    /// Switches to the requested screen.
    pub fn go_to(&mut self, screen: Screen) {
        self.current = screen;
    }

    /// Screen-specific back transition. Login and Home have nowhere further
    /// back to go; leaving the quiz returns to the topic it was started from.
    pub fn back(&mut self) {
        self.current = match &self.current {
            Screen::Login => Screen::Login,
            Screen::Home => Screen::Home,
            Screen::DailyQuestion
            | Screen::TopicDetail { .. }
            | Screen::EndPage
            | Screen::Leaderboard
            | Screen::Badges
            | Screen::Profile => Screen::Home,
            Screen::Quiz { topic } => Screen::TopicDetail {
                topic: topic.clone(),
            },
        };
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}
