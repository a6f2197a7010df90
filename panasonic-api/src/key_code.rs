//! Remote-control key vocabulary
//!
//! Every key has an identifier (`NRC_POWER`) and the string sent on the wire
//! inside `X_KeyEvent` (`NRC_POWER-ONOFF`). The set is closed and fixed.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Declares the key vocabulary enum together with its lookup tables.
///
/// A key without an explicit wire string is sent as its own identifier.
macro_rules! key_codes {
    (@wire $name:literal) => { $name };
    (@wire $name:literal, $wire:literal) => { $wire };
    (
        $(
            $(#[$meta:meta])*
            $variant:ident = $name:literal $(=> $wire:literal)?
        ),* $(,)?
    ) => {
        /// Remote-control key understood by the television
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum KeyCode {
            $(
                $(#[$meta])*
                $variant,
            )*
        }

        impl KeyCode {
            /// Every key in declaration order
            pub const ALL: &'static [KeyCode] = &[$(KeyCode::$variant),*];

            /// Identifier of this key, e.g. `NRC_POWER`
            pub fn name(&self) -> &'static str {
                match self {
                    $(KeyCode::$variant => $name,)*
                }
            }

            /// String carried in the `X_KeyEvent` element
            pub fn wire_value(&self) -> &'static str {
                match self {
                    $(KeyCode::$variant => key_codes!(@wire $name $(, $wire)?),)*
                }
            }
        }
    };
}

key_codes! {
    /// Power toggle; the protocol has no separate on/off keys
    Power = "NRC_POWER" => "NRC_POWER-ONOFF",

    Mute = "NRC_MUTE" => "NRC_MUTE-ONOFF",
    /// Terrestrial input change
    AdChange = "NRC_AD_CHANGE" => "NRC_AD_CHANGE-ONOFF",
    /// HDMI input change
    ChgInput = "NRC_CHG_INPUT" => "NRC_CHG_INPUT-ONOFF",

    VolDown = "NRC_VOLDOWN" => "NRC_VOLDOWN-ONOFF",
    VolDownOn = "NRC_VOLDOWN_ON" => "NRC_VOLDOWN-ON",
    VolDownOff = "NRC_VOLDOWN_OFF" => "NRC_VOLDOWN-OFF",
    VolUp = "NRC_VOLUP" => "NRC_VOLUP-ONOFF",
    VolUpOn = "NRC_VOLUP_ON" => "NRC_VOLUP-ON",
    VolUpOff = "NRC_VOLUP_OFF" => "NRC_VOLUP-OFF",

    ChDown = "NRC_CH_DOWN" => "NRC_CH_DOWN-ONOFF",
    ChUp = "NRC_CH_UP" => "NRC_CH_UP-ONOFF",

    Apps = "NRC_APPS" => "NRC_APPS-ONOFF",
    Home = "NRC_HOME" => "NRC_HOME-ONOFF",
    /// Exit button
    Cancel = "NRC_CANCEL" => "NRC_CANCEL-ONOFF",

    Right = "NRC_RIGHT" => "NRC_RIGHT-ONOFF",
    RightOn = "NRC_RIGHT_ON" => "NRC_RIGHT-ON",
    RightOff = "NRC_RIGHT_OFF" => "NRC_RIGHT-OFF",
    Left = "NRC_LEFT" => "NRC_LEFT-ONOFF",
    LeftOn = "NRC_LEFT_ON" => "NRC_LEFT-ON",
    LeftOff = "NRC_LEFT_OFF" => "NRC_LEFT-OFF",
    Down = "NRC_DOWN" => "NRC_DOWN-ONOFF",
    DownOn = "NRC_DOWN_ON" => "NRC_DOWN-ON",
    DownOff = "NRC_DOWN_OFF" => "NRC_DOWN-OFF",
    Up = "NRC_UP" => "NRC_UP-ONOFF",
    UpOn = "NRC_UP_ON" => "NRC_UP-ON",
    UpOff = "NRC_UP_OFF" => "NRC_UP-OFF",

    /// OK button
    Enter = "NRC_ENTER" => "NRC_ENTER-ONOFF",
    Return = "NRC_RETURN" => "NRC_RETURN-ONOFF",
    /// Options button
    Submenu = "NRC_SUBMENU" => "NRC_SUBMENU-ONOFF",

    ThreeD = "NRC_3D" => "NRC_3D-ONOFF",
    /// Aspect button
    DispMode = "NRC_DISP_MODE" => "NRC_DISP_MODE-ONOFF",
    Menu = "NRC_MENU" => "NRC_MENU-ONOFF",
    /// Guide button
    Epg = "NRC_EPG" => "NRC_EPG-ONOFF",
    Text = "NRC_TEXT" => "NRC_TEXT-ONOFF",
    Sttl = "NRC_STTL" => "NRC_STTL-ONOFF",
    Info = "NRC_INFO" => "NRC_INFO-ONOFF",
    /// e-help button
    Guide = "NRC_GUIDE" => "NRC_GUIDE-ONOFF",

    D1 = "NRC_D1" => "NRC_D1-ONOFF",
    D2 = "NRC_D2" => "NRC_D2-ONOFF",
    D3 = "NRC_D3" => "NRC_D3-ONOFF",
    D4 = "NRC_D4" => "NRC_D4-ONOFF",
    D5 = "NRC_D5" => "NRC_D5-ONOFF",
    D6 = "NRC_D6" => "NRC_D6-ONOFF",
    D7 = "NRC_D7" => "NRC_D7-ONOFF",
    D8 = "NRC_D8" => "NRC_D8-ONOFF",
    D9 = "NRC_D9" => "NRC_D9-ONOFF",
    D0 = "NRC_D0" => "NRC_D0-ONOFF",
    /// Last view button
    RTune = "NRC_R_TUNE" => "NRC_R_TUNE-ONOFF",

    Blue = "NRC_BLUE" => "NRC_BLUE-ONOFF",
    Yellow = "NRC_YELLOW" => "NRC_YELLOW-ONOFF",
    Green = "NRC_GREEN" => "NRC_GREEN-ONOFF",
    Red = "NRC_RED" => "NRC_RED-ONOFF",

    Rew = "NRC_REW" => "NRC_REW-ONOFF",
    Play = "NRC_PLAY" => "NRC_PLAY-ONOFF",
    Ff = "NRC_FF" => "NRC_FF-ONOFF",
    SkipPrev = "NRC_SKIP_PREV" => "NRC_SKIP_PREV-ONOFF",
    Pause = "NRC_PAUSE" => "NRC_PAUSE-ONOFF",
    SkipNext = "NRC_SKIP_NEXT" => "NRC_SKIP_NEXT-ONOFF",
    Stop = "NRC_STOP" => "NRC_STOP-ONOFF",
    Rec = "NRC_REC" => "NRC_REC-ONOFF",
}

const KEY_PREFIX: &str = "NRC_";

impl KeyCode {
    /// Look up a key by identifier
    ///
    /// Matching ignores ASCII case and the `NRC_` prefix is optional, so
    /// `"NRC_D5"`, `"nrc_d5"` and `"D5"` all resolve to [`KeyCode::D5`].
    pub fn from_name(identifier: &str) -> Result<KeyCode, ApiError> {
        let wanted = identifier.trim().to_ascii_uppercase();
        let wanted = if wanted.starts_with(KEY_PREFIX) {
            wanted
        } else {
            format!("{}{}", KEY_PREFIX, wanted)
        };

        Self::ALL
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ApiError::UnknownKey(identifier.to_string()))
    }

    /// Key for a single decimal digit
    pub fn digit(value: u32) -> Result<KeyCode, ApiError> {
        Self::from_name(&format!("D{}", value))
    }
}

impl FromStr for KeyCode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyCode::from_name(s)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
