//! `rangewatch-monitor` -- vehicle fuel-range alerting.
//!
//! Runs one monitor cycle per invocation: reads the vehicle's remaining
//! range from a telematics endpoint, evaluates it against the low /
//! critical thresholds, and dispatches at most one deduplicated
//! notification through the configured channel. Scheduling is external
//! (cron or a container orchestrator); exit code 0 means the cycle
//! completed, non-zero means missing configuration or a failed range
//! read.
//!
//! # Environment variables
//!
//! | Variable           | Required | Default   | Description                                |
//! |--------------------|----------|-----------|--------------------------------------------|
//! | `TELEMATICS_URL`   | yes      | --        | Range endpoint, e.g. `https://host/range`  |
//! | `TELEMATICS_TOKEN` | no       | --        | Bearer token for the range endpoint        |
//! | `NOTIFY_CHANNEL`   | no       | `console` | `console` \| `sms-direct` \| `sms-gateway-email` \| `cloud-sns` |
//! | `VEHICLE_NAME`     | no       | `Vehicle` | Label used in notification bodies          |
//! | `LOW_MILES`        | no       | `50`      | Advisory threshold                         |
//! | `CRITICAL_MILES`   | no       | `15`      | Urgent threshold                           |
//! | `STATE_PATH`       | no       | `/var/lib/rangewatch/state.json` | Alert state record |
//! | `FORCE_SEVERITY`   | no       | --        | `low` \| `critical` delivery test override |
//!
//! Per-channel credentials (`SMS_*`, `SMTP_*` + `GATEWAY_ADDRESSES`,
//! `AWS_REGION` + `SNS_TO_NUMBERS`) are documented in
//! [`config::MonitorConfig::from_env`].

use rangewatch_monitor::config::MonitorConfig;
use rangewatch_monitor::cycle;
use rangewatch_monitor::store::StateStore;
use rangewatch_monitor::telematics::HttpRangeSource;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rangewatch_monitor=info,rangewatch_notify=info,rangewatch_core=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match MonitorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration invalid");
            std::process::exit(1);
        }
    };

    let channel = match rangewatch_notify::build_channel(config.channel.clone()).await {
        Ok(channel) => channel,
        Err(e) => {
            tracing::error!(error = %e, "Notification channel construction failed");
            std::process::exit(1);
        }
    };

    tracing::info!(
        vehicle = %config.vehicle,
        channel = %channel.describe(),
        low_miles = config.thresholds.low_miles,
        critical_miles = config.thresholds.critical_miles,
        "Starting rangewatch monitor",
    );

    // Delivery-channel verification path: one synthetic notification,
    // no engine, no state.
    if let Some(severity) = config.force_severity {
        if let Err(e) = cycle::send_test_notification(channel.as_ref(), &config.vehicle, severity).await
        {
            tracing::error!(error = %e, "Forced test notification delivery failed");
        }
        return;
    }

    let source = HttpRangeSource::new(config.telematics.clone());
    let store = StateStore::new(config.state_path.clone());

    if let Err(e) = cycle::run_cycle(
        &source,
        &store,
        channel.as_ref(),
        &config.thresholds,
        &config.vehicle,
    )
    .await
    {
        tracing::error!(error = %e, "Monitor cycle failed");
        std::process::exit(1);
    }
}
