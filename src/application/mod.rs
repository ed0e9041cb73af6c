mod measure;
mod url_parser;
mod input;
mod session;
mod config;

pub use measure::MeasureUseCase;
pub use url_parser::{normalize, ParsedUrl};
pub use input::InputField;
pub use session::{Action, Command, Event, Feedback, Outcome, Session, View};
pub use config::Config;
