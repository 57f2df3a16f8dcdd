//! `purelink devices` -- list the appliances registered to the account.

use tabled::Tabled;

use purelink_api::{Device, DiscoveryPolicy};

use crate::cli::{DevicesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "SERIAL")]
    serial: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "MODEL")]
    model: String,
    #[tabled(rename = "TYPE")]
    product_type: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "UPDATE")]
    update: String,
}

fn to_row(device: &Device) -> DeviceRow {
    DeviceRow {
        serial: device.record.serial.clone(),
        name: device.record.name.clone().unwrap_or_default(),
        model: device.kind.label().into(),
        product_type: device.record.product_type.clone(),
        version: device.record.version.clone().unwrap_or_default(),
        update: match device.record.new_version_available {
            Some(true) => "available".into(),
            Some(false) => "-".into(),
            None => "?".into(),
        },
    }
}

pub async fn handle(args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let DevicesArgs { all } = args;
    let policy = if all {
        DiscoveryPolicy::LegacyDoublePass
    } else {
        DiscoveryPolicy::Deduplicated
    };

    let (account, _) = util::build_account(global, false, false)?;
    let account = account.with_discovery_policy(policy);

    if !account.restore_session()? {
        return Err(CliError::NotLoggedIn);
    }

    let devices = account.list_devices().await?;
    let rendered = output::render_list(&global.output, &devices, to_row, |d| {
        d.record.serial.clone()
    });
    output::print_output(&rendered, global.quiet);
    Ok(())
}
