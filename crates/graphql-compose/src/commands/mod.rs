mod compose;

use crate::Cli;
use crate::CommandResult;
pub(crate) use compose::ComposeCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "graphql-compose")]
pub(crate) enum CommandEnum {
    /// Assemble a query from a document, fragments, aliases, directives, and
    /// variable definitions, then print it.
    Compose(Box<ComposeCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Compose(cmd) => cmd.run(cli).await
        }
    }
}
