// Page contract and front-end tuning.

use std::time::Duration;

// Fixed slots every node page provides
pub const INFO_BOX_ID: &str = "infoBox";
pub const NARRATION_TEXT_ID: &str = "narrationText";
pub const NARRATION_AUDIO_ID: &str = "narrationAudio";
pub const EXTRA_BUTTONS_ID: &str = "extraButtons";
pub const POPUP_OVERLAY_ID: &str = "popupOverlay";
pub const POPUP_TEXT_ID: &str = "popupText";
pub const POPUP_CLOSE_ID: &str = "popupClose";

// Elements the front-end adds under its own container
pub const UI_ROOT_ID: &str = "otter-ui";
pub const AR_BUTTON_ID: &str = "ar-button";
pub const PROMPT_ID: &str = "otter-prompt";
pub const WARNING_ID: &str = "otter-warning";
pub const TOAST_ID: &str = "otter-toast";
pub const PROGRESS_ID: &str = "otter-progress";
pub const BALANCE_ID: &str = "otter-balance";
pub const ACTIONS_ID: &str = "otter-actions";
pub const RETRY_ID: &str = "otter-retry";
pub const NAV_ID: &str = "otter-nav";

pub const DEFAULT_AR_LABEL: &str = "Start AR";
pub const AR_UNSUPPORTED_LABEL: &str = "AR not supported";

// Global the page's 3D engine installs itself under
pub const ENGINE_GLOBAL: &str = "otterEngine";

// Elements that swallow pointer input instead of steering the scene
pub const UI_SELECTOR: &str = "button, a, #popupOverlay, #infoBox";

// A long stall (tab switch) is replayed as one short frame
pub const MAX_FRAME_DT: Duration = Duration::from_millis(100);
