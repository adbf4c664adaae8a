// Host-side tests for the frequency analyzer over a fake analysis graph.

mod support;

use support::*;
use synesthesia::core::{FrequencyAnalyzer, SampleMode};
use synesthesia::error::VisualizerError;

fn analyzer(transform_size: u32, mode: SampleMode) -> (FrequencyAnalyzer<FakeFactory>, GraphLog) {
    let factory = FakeFactory::default();
    let log = factory.log.clone();
    (
        FrequencyAnalyzer::new(factory, transform_size, mode).expect("valid size"),
        log,
    )
}

#[test]
fn configure_yields_half_length_buffer_for_every_valid_size() {
    let (mut a, _) = analyzer(32, SampleMode::Frequency);
    let mut size = 32;
    while size <= 32768 {
        a.configure(size).unwrap();
        assert_eq!(a.buffer().len(), (size / 2) as usize, "size {size}");
        assert_eq!(a.transform_size(), size);
        size *= 2;
    }
}

#[test]
fn configure_rejects_invalid_sizes_and_keeps_previous() {
    let (mut a, _) = analyzer(128, SampleMode::Frequency);
    for bad in [0, 1, 16, 100, 255, 65536] {
        assert_eq!(
            a.configure(bad),
            Err(VisualizerError::InvalidTransformSize(bad))
        );
        assert_eq!(a.transform_size(), 128);
        assert_eq!(a.buffer().len(), 64);
    }
}

#[test]
fn sample_before_attach_is_not_attached() {
    let (mut a, _) = analyzer(128, SampleMode::Frequency);
    assert_eq!(a.sample().err(), Some(VisualizerError::NotAttached));
}

#[test]
fn silent_source_gives_zeroed_constant_buffer() {
    let (mut a, _) = analyzer(64, SampleMode::Frequency);
    a.configure(256).unwrap();
    a.attach(&FakeSource::new(1, Signal::Silent)).unwrap();

    let first = a.sample().unwrap().clone();
    assert_eq!(first.len(), 128);
    assert!(first.as_slice().iter().all(|&v| v == 0));

    for _ in 0..10 {
        assert_eq!(a.sample().unwrap(), &first);
    }
}

#[test]
fn silent_time_domain_sits_on_midpoint() {
    let (mut a, _) = analyzer(256, SampleMode::TimeDomain);
    a.attach(&FakeSource::new(1, Signal::Silent)).unwrap();
    let buf = a.sample().unwrap();
    assert!(buf.as_slice().iter().all(|&v| v == 128));
}

#[test]
fn sample_mode_selects_snapshot_kind() {
    let (mut a, _) = analyzer(128, SampleMode::Frequency);
    a.attach(&FakeSource::new(1, Signal::Silent)).unwrap();
    assert_eq!(a.sample().unwrap().as_slice()[0], 0);
    a.set_sample_mode(SampleMode::TimeDomain);
    assert_eq!(a.sample_mode(), SampleMode::TimeDomain);
    assert_eq!(a.sample().unwrap().as_slice()[0], 128);
}

#[test]
fn reattach_discards_previous_graph() {
    let (mut a, log) = analyzer(128, SampleMode::Frequency);
    a.attach(&FakeSource::new(1, Signal::Ramp)).unwrap();
    a.attach(&FakeSource::new(2, Signal::Silent)).unwrap();
    a.attach(&FakeSource::new(3, Signal::Silent)).unwrap();
    assert_eq!(log.attached.get(), 3);
    assert_eq!(log.detached.get(), 2);
    assert_eq!(log.live(), 1);
}

#[test]
fn attach_resets_buffer() {
    let (mut a, _) = analyzer(128, SampleMode::Frequency);
    a.attach(&FakeSource::new(1, Signal::Level(255))).unwrap();
    a.sample().unwrap();
    assert!(a.buffer().as_slice().iter().all(|&v| v == 255));
    a.attach(&FakeSource::new(2, Signal::Level(255))).unwrap();
    assert!(a.buffer().as_slice().iter().all(|&v| v == 0));
}

#[test]
fn locked_context_fails_attach_and_leaves_nothing_bound() {
    let (mut a, _) = analyzer(128, SampleMode::Frequency);
    a.factory_mut().locked.set(true);
    assert_eq!(
        a.attach(&FakeSource::new(1, Signal::Silent)),
        Err(VisualizerError::AudioContextUnavailable)
    );
    assert!(!a.is_attached());

    // Recoverable once the context is unlocked.
    a.factory_mut().locked.set(false);
    a.attach(&FakeSource::new(1, Signal::Silent)).unwrap();
    assert!(a.is_attached());
}

#[test]
fn reconfigure_while_attached_updates_the_node() {
    let (mut a, log) = analyzer(128, SampleMode::Frequency);
    a.attach(&FakeSource::new(1, Signal::Silent)).unwrap();
    a.configure(512).unwrap();
    assert_eq!(log.fft_sizes.borrow().as_slice(), &[128, 512]);
    assert_eq!(a.sample().unwrap().len(), 256);
}

#[test]
fn detach_is_idempotent() {
    let (mut a, log) = analyzer(128, SampleMode::Frequency);
    a.attach(&FakeSource::new(1, Signal::Silent)).unwrap();
    a.detach();
    a.detach();
    assert_eq!(log.detached.get(), 1);
    assert_eq!(a.sample().err(), Some(VisualizerError::NotAttached));
}
