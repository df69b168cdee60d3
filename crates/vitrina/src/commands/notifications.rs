//! Notification command handlers.

use std::sync::Arc;

use tabled::Tabled;
use vitrina_core::{Command as CoreCommand, Marketplace, Notice, Notification};

use crate::cli::{GlobalOpts, NotificationsArgs, NotificationsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    unread: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&Arc<Notification>> for NotificationRow {
    fn from(n: &Arc<Notification>) -> Self {
        Self {
            id: n.id.clone(),
            unread: if n.read { "" } else { "●" }.into(),
            when: n.created_at.map(util::fmt_local).unwrap_or_default(),
            message: n.message.clone(),
        }
    }
}

pub async fn handle(
    marketplace: &Marketplace,
    args: NotificationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !marketplace.session().is_authenticated() {
        return Err(CliError::NotSignedIn);
    }

    match args.command {
        NotificationsCommand::List => {
            let items = marketplace.notifications();
            let out = output::render_list(
                &global.output,
                &items,
                |n| NotificationRow::from(n),
                |n| n.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if matches!(global.output, crate::cli::OutputFormat::Table) {
                let unread = marketplace.unread_notifications();
                util::notify(global, &Notice::info(format!("{unread} sin leer")));
            }
            Ok(())
        }

        NotificationsCommand::Read { id } => {
            marketplace
                .execute(CoreCommand::MarkNotificationRead { id })
                .await?;
            Ok(())
        }

        NotificationsCommand::ReadAll => {
            marketplace
                .execute(CoreCommand::MarkAllNotificationsRead)
                .await?;
            util::notify(global, &Notice::success("Todas las notificaciones leídas."));
            Ok(())
        }
    }
}
