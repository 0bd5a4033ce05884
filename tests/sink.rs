use calltrail::sink::{CaptureBuffer, Sink, Sinks};
use std::error::Error;
use std::io::Write;
use tracing_subscriber::fmt::MakeWriter;

#[test]
fn sinks_start_on_the_standard_streams() {
    let sinks = Sinks::new();
    assert!(sinks.out_sink().is_std());
    assert!(sinks.err_sink().is_std());
    assert!(sinks.out().is_std());
    assert!(sinks.err_buffer().is_none());

    // Nothing is captured, so nothing can be read back.
    assert_eq!(sinks.read_out(), "");
    assert_eq!(sinks.read_err(), "");
    assert!(sinks.has_no_output());
}

#[test]
fn redirected_sinks_capture_every_write() -> Result<(), Box<dyn Error>> {
    let mut sinks = Sinks::new();
    sinks.redirect_to_buffers();
    assert!(!sinks.out_sink().is_std());
    assert!(!sinks.err().is_std());

    write!(sinks.out(), "first ")?;
    write!(sinks.out(), "second")?;
    writeln!(sinks.err(), "oops")?;

    assert_eq!(sinks.read_out(), "first second");
    assert_eq!(sinks.read_err(), "oops\n");
    assert!(!sinks.has_no_output());
    Ok(())
}

#[test]
fn reset_clears_but_keeps_the_redirection() -> Result<(), Box<dyn Error>> {
    let sinks = Sinks::buffered();
    write!(sinks.out(), "before")?;
    write!(sinks.err(), "before")?;

    sinks.reset();
    assert!(sinks.has_no_output());

    write!(sinks.err(), "after")?;
    assert_eq!(sinks.read_out(), "");
    assert_eq!(sinks.read_err(), "after");
    Ok(())
}

#[test]
fn redirecting_again_starts_from_empty_buffers() -> Result<(), Box<dyn Error>> {
    let mut sinks = Sinks::buffered();
    let old = sinks.err_buffer().ok_or("not redirected")?;
    write!(sinks.err(), "stale")?;

    sinks.redirect_to_buffers();
    assert_eq!(sinks.read_err(), "");
    assert_eq!(old.contents(), "stale");
    Ok(())
}

#[test]
fn buffer_handles_share_contents() -> Result<(), Box<dyn Error>> {
    let sinks = Sinks::buffered();
    let handle = sinks.out_buffer().ok_or("not redirected")?;
    assert!(handle.is_empty());

    write!(sinks.out(), "shared")?;
    assert_eq!(handle.contents(), "shared");

    handle.clear();
    assert!(sinks.has_no_output());
    Ok(())
}

#[test]
fn sink_works_as_a_subscriber_writer() -> Result<(), Box<dyn Error>> {
    let buffer = CaptureBuffer::new();
    let sink = Sink::Captured(buffer.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink)
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("routed through a sink");
    });

    assert!(buffer.contents().contains("routed through a sink"));

    let mut writer = Sink::Captured(buffer.clone()).make_writer();
    writer.write_all(b"!")?;
    assert!(buffer.contents().ends_with('!'));
    Ok(())
}
