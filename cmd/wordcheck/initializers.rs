use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, Registry, filter::Directive, fmt, layer::SubscriberExt};
use wordcheck_harness::{BitFlip, Evm, InProcess, Loopback, SystemUnderTest};

use crate::cli::{Options, SutKind};

/// Logs go to stderr so the textual report on stdout stays clean.
pub fn init_tracing(opts: &Options) {
    let log_filter = EnvFilter::builder()
        .with_default_directive(Directive::from(opts.log_level))
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(log_filter);
    let subscriber = Registry::default().with(fmt_layer);

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {err}");
    }
}

pub fn init_sut(opts: &Options) -> Arc<dyn SystemUnderTest> {
    let sut: Arc<dyn SystemUnderTest> = match opts.sut {
        SutKind::Vm => Arc::new(InProcess::new(Evm)),
        SutKind::Loopback => Arc::new(Loopback::new(Evm)),
        SutKind::Faulty => Arc::new(InProcess::new(BitFlip::new(
            Evm,
            opts.fault_opcode,
            opts.fault_bit,
        ))),
    };
    info!(sut = sut.name(), "Initialized system under test");
    sut
}
