//! Ordered MAC command list carried by one frame.

use crate::error::MacCommandError;
use crate::mac::{Direction, MacCommand};

/// MAC commands piggy-backed on a single frame, in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacCommandHolder {
    commands: Vec<MacCommand>,
}

impl MacCommandHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every command in `bytes` (an FOpts field or a port 0 payload).
    pub fn parse(bytes: &[u8], direction: Direction) -> Result<Self, MacCommandError> {
        let mut commands = Vec::new();
        let mut offset = 0;
        while offset < bytes.len() {
            let (command, used) = MacCommand::parse(&bytes[offset..], direction)?;
            commands.push(command);
            offset += used;
        }
        Ok(Self { commands })
    }

    pub fn push(&mut self, command: MacCommand) {
        self.commands.push(command);
    }

    pub fn with_command(mut self, command: MacCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MacCommand> {
        self.commands.iter()
    }

    /// Sum of the declared wire lengths.
    pub fn wire_len(&self) -> usize {
        self.commands.iter().map(MacCommand::length).sum()
    }

    /// Concatenated wire encoding; fails on the first command that cannot
    /// be encoded instead of skipping it.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MacCommandError> {
        let mut bytes = Vec::with_capacity(self.wire_len());
        for command in &self.commands {
            bytes.extend(command.to_bytes()?);
        }
        Ok(bytes)
    }
}

impl From<Vec<MacCommand>> for MacCommandHolder {
    fn from(commands: Vec<MacCommand>) -> Self {
        Self { commands }
    }
}

impl<'a> IntoIterator for &'a MacCommandHolder {
    type Item = &'a MacCommand;
    type IntoIter = std::slice::Iter<'a, MacCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
