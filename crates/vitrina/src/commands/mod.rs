//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod admin;
pub mod auth;
pub mod config_cmd;
pub mod interactions;
pub mod merchant;
pub mod notifications;
pub mod reels;
pub mod shops;
pub mod streams;
pub mod util;

use vitrina_core::Marketplace;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a marketplace-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    marketplace: &Marketplace,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Shops(args) => shops::handle(marketplace, args, global),
        Command::Streams(args) => streams::handle(marketplace, args, global).await,
        Command::Reels(args) => reels::handle(marketplace, args, global).await,
        Command::Favorites(args) => interactions::favorites(marketplace, args, global).await,
        Command::Reminders(args) => interactions::reminders(marketplace, args, global).await,
        Command::Likes(args) => interactions::likes(marketplace, args, global).await,
        Command::Report { stream, reason } => {
            interactions::report(marketplace, stream, reason, global).await
        }
        Command::Notifications(args) => notifications::handle(marketplace, args, global).await,
        Command::Merchant(args) => merchant::handle(marketplace, args, global).await,
        Command::Admin(args) => admin::handle(marketplace, args, global).await,
        // Handled before a marketplace is built
        Command::Auth(_) | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
