//! Reel command handlers.

use std::sync::Arc;

use chrono::Utc;
use tabled::Tabled;
use vitrina_core::{Command as CoreCommand, Marketplace, Reel};

use crate::cli::{GlobalOpts, ReelsArgs, ReelsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ReelRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Shop")]
    shop: String,
    #[tabled(rename = "Expires in")]
    expires_in: String,
    #[tabled(rename = "Views")]
    views: u64,
    #[tabled(rename = "Seen")]
    seen: String,
}

pub async fn handle(
    marketplace: &Marketplace,
    args: ReelsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReelsCommand::List => {
            let reels = marketplace.active_reels();
            let ctx = marketplace.user_context();
            let now = Utc::now();
            let out = output::render_list(
                &global.output,
                &reels,
                |r: &Arc<Reel>| {
                    let left = r.expires_at - now;
                    ReelRow {
                        id: r.id.clone(),
                        shop: r.shop.name.clone(),
                        expires_in: format!("{}h {:02}m", left.num_hours(), left.num_minutes() % 60),
                        views: r.views,
                        seen: if ctx.has_viewed_reel(&r.id) { "yes" } else { "" }.into(),
                    }
                },
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReelsCommand::View { reel } => {
            if marketplace.store().reel_by_id(&reel).is_none() {
                return Err(CliError::NotFound {
                    resource_type: "reel".into(),
                    identifier: reel,
                    list_command: "reels list".into(),
                });
            }
            marketplace
                .execute(CoreCommand::MarkReelViewed { reel_id: reel })
                .await?;
            Ok(())
        }
    }
}
