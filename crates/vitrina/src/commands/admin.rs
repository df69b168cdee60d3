//! Administrator command handlers.

use std::sync::Arc;

use tabled::Tabled;
use vitrina_core::{Command as CoreCommand, Marketplace, Notice, Report, ShopStatus};

use crate::cli::{AdminArgs, AdminCommand, GlobalOpts, ShopStatusArg};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<ShopStatusArg> for ShopStatus {
    fn from(s: ShopStatusArg) -> Self {
        match s {
            ShopStatusArg::Active => Self::Active,
            ShopStatusArg::Pending => Self::Pending,
            ShopStatusArg::Suspended => Self::Suspended,
            ShopStatusArg::Hidden => Self::Hidden,
            ShopStatusArg::Banned => Self::Banned,
        }
    }
}

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Stream")]
    stream: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl From<&Arc<Report>> for ReportRow {
    fn from(r: &Arc<Report>) -> Self {
        Self {
            id: r.id.clone(),
            status: r.status.to_string(),
            stream: r.stream_id.clone().unwrap_or_default(),
            reason: r.reason.clone(),
        }
    }
}

pub async fn handle(
    marketplace: &Marketplace,
    args: AdminArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AdminCommand::Reports => {
            vitrina_core::session::guard_admin(&marketplace.session())?;
            let reports = marketplace.reports();
            let out = output::render_list(
                &global.output,
                &reports,
                |r| ReportRow::from(r),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminCommand::ShopStatus { shop, status } => {
            let status = ShopStatus::from(status);
            marketplace
                .execute(CoreCommand::SetShopStatus {
                    shop_id: shop.clone(),
                    status,
                })
                .await?;
            util::notify(global, &Notice::success(format!("Tienda {shop}: {status}")));
            Ok(())
        }

        AdminCommand::BanStream { stream } => {
            if !util::confirm(&format!("¿Bloquear el vivo {stream}?"), global.yes)? {
                return Ok(());
            }
            marketplace
                .execute(CoreCommand::BanStream { stream_id: stream })
                .await?;
            util::notify(global, &Notice::success("Vivo bloqueado."));
            Ok(())
        }

        AdminCommand::ResolveReport { report } => {
            marketplace
                .execute(CoreCommand::ResolveReport { report_id: report })
                .await?;
            util::notify(global, &Notice::success("Denuncia resuelta."));
            Ok(())
        }

        AdminCommand::ResetShopPassword { shop } => {
            let new_password = util::prompt_secret("Nueva contraseña: ")?;
            marketplace
                .execute(CoreCommand::ResetShopPassword {
                    shop_id: shop,
                    new_password,
                })
                .await?;
            util::notify(global, &Notice::success("Contraseña actualizada."));
            Ok(())
        }

        AdminCommand::AssignOwner { shop, email } => {
            marketplace
                .execute(CoreCommand::AssignShopOwner {
                    shop_id: shop,
                    email,
                })
                .await?;
            util::notify(global, &Notice::success("Dueño asignado."));
            Ok(())
        }
    }
}
