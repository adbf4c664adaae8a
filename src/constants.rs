/// Visual tuning and platform limits.
///
/// Keeping these in one place keeps magic numbers out of the mapping code.
// Analysis node limits (WebAudio accepts powers of two in this range)
pub const MIN_TRANSFORM_SIZE: u32 = 32;
pub const MAX_TRANSFORM_SIZE: u32 = 32768;

// Default transform size per visual mapping
pub const BARS_TRANSFORM_SIZE: u32 = 128;
pub const SCOPE_TRANSFORM_SIZE: u32 = 256;

// Byte midpoint of a silent time-domain signal
pub const TIME_DOMAIN_MIDPOINT: u8 = 128;

// Bar-spectrum colour: red rises with amplitude, green/blue fixed
pub const BAR_RED_BASE: u32 = 50;
pub const BAR_RED_GAIN: u32 = 2;
pub const BAR_GREEN: u8 = 255;
pub const BAR_BLUE: u8 = 133;
pub const BAR_GLOW_BLUR_PX: f32 = 20.0;
// Bars are inset by at most one pixel so their widths still add up to the
// surface width within a pixel per bar
pub const BAR_GAP_PX: f32 = 1.0;
pub const BAR_MAX_GAP_PX: f32 = 1.0;
pub const BAR_MIN_WIDTH_PX: f32 = 1.0;

// Oscilloscope styling
pub const SCOPE_BACKGROUND: [u8; 3] = [10, 10, 18];
pub const SCOPE_LINE_COLOR: [u8; 3] = [50, 255, 133];
pub const SCOPE_LINE_WIDTH_PX: f32 = 2.0;

// Frame statistics are logged once per this many rendered frames
pub const FRAME_STATS_INTERVAL: u64 = 600;

// DOM element ids
pub const CANVAS_ID: &str = "visualizer";
pub const PLAY_BUTTON_ID: &str = "play-btn";
pub const PAUSE_BUTTON_ID: &str = "pause-btn";
pub const FILE_INPUT_ID: &str = "file-input";
pub const STATUS_ID: &str = "status";

// Dispatched on an <audio> element whose play() promise was rejected
pub const PLAY_REJECTED_EVENT: &str = "playrejected";
