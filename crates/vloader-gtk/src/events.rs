use vloader::animator::Phase;
use vloader::command::Command;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Command(Command),
    /// Asks what the loader is doing; the answer goes back on the sender.
    Status(async_channel::Sender<Phase>),
    ConfigReload,
}
