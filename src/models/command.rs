use derive_more::{Display, From};

/// A single command invocation delivered to a component.
/// Any `i32` is a valid argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, From)]
#[display(fmt = "Command(arg={})", arg)]
pub struct Command {
    pub arg: i32,
}

impl Command {
    pub fn new(arg: i32) -> Self {
        Self { arg }
    }
}
