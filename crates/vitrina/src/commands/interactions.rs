//! Client interactions: favorites, reminders, likes and reports.

use vitrina_core::{Command as CoreCommand, CommandResult, Marketplace, Notice};

use crate::cli::{GlobalOpts, ToggleArgs, ToggleCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn print_ids(ids: &[String], global: &GlobalOpts) {
    let out = output::render_single(&global.output, &ids, |ids| ids.join("\n"), |ids| ids.join("\n"));
    output::print_output(&out, global.quiet);
}

pub async fn favorites(
    marketplace: &Marketplace,
    args: ToggleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ToggleCommand::List => {
            print_ids(&marketplace.user_context().favorites, global);
            Ok(())
        }
        ToggleCommand::Toggle { id } => {
            let result = marketplace
                .execute(CoreCommand::ToggleFavorite { shop_id: id })
                .await?;
            if let CommandResult::Favorites { added, .. } = result {
                let msg = if added {
                    "Tienda agregada a favoritos."
                } else {
                    "Tienda quitada de favoritos."
                };
                util::notify(global, &Notice::success(msg));
            }
            Ok(())
        }
    }
}

pub async fn reminders(
    marketplace: &Marketplace,
    args: ToggleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ToggleCommand::List => {
            print_ids(&marketplace.user_context().reminders, global);
            Ok(())
        }
        ToggleCommand::Toggle { id } => {
            let result = marketplace
                .execute(CoreCommand::ToggleReminder {
                    stream_id: id.clone(),
                })
                .await?;
            if let CommandResult::Reminders {
                added,
                offer_invite,
                ..
            } = result
            {
                let msg = if added {
                    "Te vamos a avisar cuando empiece."
                } else {
                    "Recordatorio eliminado."
                };
                util::notify(global, &Notice::success(msg));
                if offer_invite {
                    util::notify(
                        global,
                        &Notice::info(format!(
                            "Agregalo a tu calendario: vitrina streams ics {id} --out vivo-{id}.ics"
                        )),
                    );
                }
            }
            Ok(())
        }
    }
}

pub async fn likes(
    marketplace: &Marketplace,
    args: ToggleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ToggleCommand::List => {
            print_ids(&marketplace.user_context().liked_streams, global);
            Ok(())
        }
        ToggleCommand::Toggle { id } => {
            let result = marketplace
                .execute(CoreCommand::ToggleLike { stream_id: id })
                .await?;
            if let CommandResult::Like { liked, likes } = result {
                let verb = if liked { "Te gusta" } else { "Ya no te gusta" };
                util::notify(global, &Notice::success(format!("{verb} este vivo ({likes} me gusta).")));
            }
            Ok(())
        }
    }
}

pub async fn report(
    marketplace: &Marketplace,
    stream: String,
    reason: String,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    marketplace
        .execute(CoreCommand::ReportStream {
            stream_id: stream,
            reason,
        })
        .await?;
    util::notify(
        global,
        &Notice::success("Gracias, vamos a revisar la denuncia."),
    );
    Ok(())
}
