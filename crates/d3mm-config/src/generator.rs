//! Known-good default configuration documents.

use crate::error::GameConfigError;
use crate::game_config::{Entry, EntryValue, GameConfiguration, Section};

pub const SETUP_SECTION_NAME: &str = "Setup";
pub const SETUP_VERSION_ENTRY_NAME: &str = "SetupVersion";
pub const REGULAR_VERSION_SETUP_VERSION: &str = "1.3D";
pub const ATOMIC_EDITION_SETUP_VERSION: &str = "1.4";
pub const SCREEN_SETUP_SECTION_NAME: &str = "Screen Setup";
pub const SCREEN_MODE_ENTRY_NAME: &str = "ScreenMode";
pub const SCREEN_WIDTH_ENTRY_NAME: &str = "ScreenWidth";
pub const SCREEN_HEIGHT_ENTRY_NAME: &str = "ScreenHeight";
pub const SOUND_SETUP_SECTION_NAME: &str = "Sound Setup";
pub const FX_DEVICE_ENTRY_NAME: &str = "FXDevice";
pub const MUSIC_DEVICE_ENTRY_NAME: &str = "MusicDevice";
pub const FX_VOLUME_ENTRY_NAME: &str = "FXVolume";
pub const MUSIC_VOLUME_ENTRY_NAME: &str = "MusicVolume";
pub const NUM_BITS_ENTRY_NAME: &str = "NumBits";
pub const MIX_RATE_ENTRY_NAME: &str = "MixRate";
pub const KEY_DEFINITIONS_SECTION_NAME: &str = "KeyDefinitions";
pub const CONTROLS_SECTION_NAME: &str = "Controls";
pub const COMM_SETUP_SECTION_NAME: &str = "Comm Setup";

/// The long names the generator recognizes.
pub const REGULAR_VERSION_GAME_NAME: &str = "Duke Nukem 3D 1.3D";
pub const ATOMIC_EDITION_GAME_NAME: &str = "Duke Nukem 3D: Atomic Edition 1.5";

const DEFAULT_COMBAT_MACROS: [&str; 10] = [
    "An inspiration for birth control.",
    "You're gonna die for that!",
    "It hurts to be you.",
    "Lucky Son of a Bitch.",
    "Hmmm....Payback time.",
    "You bottom dwelling scum sucker.",
    "Damn, you're ugly.",
    "Ha ha ha...Wasted!",
    "You suck!",
    "AARRRGHHHHH!!!",
];

/// Which engine family a configuration document is seeded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFlavor {
    Regular,
    Atomic,
}

fn flavor_for_game_name(game_name: &str) -> Option<ConfigFlavor> {
    if game_name.eq_ignore_ascii_case(REGULAR_VERSION_GAME_NAME) {
        Some(ConfigFlavor::Regular)
    } else if game_name.eq_ignore_ascii_case(ATOMIC_EDITION_GAME_NAME) {
        Some(ConfigFlavor::Atomic)
    } else {
        None
    }
}

impl GameConfiguration {
    /// Build the known-good default configuration for a game name,
    /// seeded with the version-appropriate values for v1.3D or the Atomic
    /// Edition.
    pub fn generate_default(game_name: &str) -> Result<GameConfiguration, GameConfigError> {
        let flavor = flavor_for_game_name(game_name).ok_or_else(|| {
            GameConfigError::Integrity(format!(
                "no default configuration for game '{game_name}'"
            ))
        })?;
        let is_atomic = flavor == ConfigFlavor::Atomic;

        let mut document = GameConfiguration::new();

        // Setup
        document.add_section(
            Section::new(SETUP_SECTION_NAME)
                .with_following_comments(&["Setup File for Duke Nukem 3D"]),
        )?;

        let setup_version = match flavor {
            ConfigFlavor::Regular => REGULAR_VERSION_SETUP_VERSION,
            ConfigFlavor::Atomic => ATOMIC_EDITION_SETUP_VERSION,
        };
        document.add_entry_to_section(
            SETUP_SECTION_NAME,
            Entry::new(SETUP_VERSION_ENTRY_NAME, EntryValue::Str(setup_version.into())),
        )?;

        // Screen Setup
        document.add_section(
            Section::new(SCREEN_SETUP_SECTION_NAME)
                .with_preceding_comments(&[" ", " "])
                .with_following_comments(&[
                    " ",
                    " ",
                    "ScreenMode",
                    " - Chained - 0",
                    " - Vesa 2.0 - 1",
                    " - Screen Buffered - 2",
                    " - Tseng optimized - 3",
                    " - Paradise optimized - 4",
                    " - S3 optimized - 5",
                    " - RedBlue Stereo - 7",
                    " - Crystal Eyes - 6",
                    " ",
                    "ScreenWidth passed to engine",
                    " ",
                    "ScreenHeight passed to engine",
                    " ",
                    " ",
                ]),
        )?;

        for (name, value) in [
            (SCREEN_MODE_ENTRY_NAME, 2),
            (SCREEN_WIDTH_ENTRY_NAME, 320),
            (SCREEN_HEIGHT_ENTRY_NAME, 200),
        ] {
            document.add_entry_to_section(
                SCREEN_SETUP_SECTION_NAME,
                Entry::new(name, EntryValue::Integer(value)),
            )?;
        }

        // Sound Setup
        document.add_section(
            Section::new(SOUND_SETUP_SECTION_NAME)
                .with_preceding_comments(&[" ", " "])
                .with_following_comments(&[" ", " "]),
        )?;

        for (name, value) in [
            (FX_DEVICE_ENTRY_NAME, EntryValue::Integer(13)),
            (MUSIC_DEVICE_ENTRY_NAME, EntryValue::Integer(13)),
            (FX_VOLUME_ENTRY_NAME, EntryValue::Integer(220)),
            (MUSIC_VOLUME_ENTRY_NAME, EntryValue::Integer(200)),
            ("NumVoices", EntryValue::Integer(8)),
            ("NumChannels", EntryValue::Integer(2)),
            (NUM_BITS_ENTRY_NAME, EntryValue::Integer(1)),
            (MIX_RATE_ENTRY_NAME, EntryValue::Integer(11000)),
            ("MidiPort", EntryValue::Hexadecimal(0x330)),
            ("BlasterAddress", EntryValue::Hexadecimal(0x220)),
            ("BlasterType", EntryValue::Integer(6)),
            ("BlasterInterrupt", EntryValue::Integer(7)),
            ("BlasterDma8", EntryValue::Integer(1)),
            ("BlasterDma16", EntryValue::Integer(5)),
            ("BlasterEmu", EntryValue::Hexadecimal(0x620)),
            ("ReverseStereo", EntryValue::Integer(0)),
        ] {
            document.add_entry_to_section(SOUND_SETUP_SECTION_NAME, Entry::new(name, value))?;
        }

        // KeyDefinitions
        document.add_section(
            Section::new(KEY_DEFINITIONS_SECTION_NAME)
                .with_preceding_comments(&[" ", " "])
                .with_following_comments(&[" ", " "]),
        )?;

        let key_pairs: &[(&str, &str, &str)] = &[
            ("Move_Forward", "Up", "Kpad8"),
            ("Move_Backward", "Down", "Kpad2"),
            ("Turn_Left", "Left", "Kpad4"),
            ("Turn_Right", "Right", "KPad6"),
            ("Strafe", "LAlt", "RAlt"),
            ("Fire", "LCtrl", "RCtrl"),
            ("Open", "Space", ""),
            ("Run", "LShift", "RShift"),
            ("AutoRun", "CapLck", ""),
            ("Jump", "A", "/"),
            ("Crouch", "Z", ""),
            ("Look_Up", "PgUp", "Kpad9"),
            ("Look_Down", "PgDn", "Kpad3"),
            ("Look_Left", "Insert", "Kpad0"),
            ("Look_Right", "Delete", "Kpad."),
            ("Strafe_Left", ",", ""),
            ("Strafe_Right", ".", ""),
            ("Aim_Up", "Home", "KPad7"),
            ("Aim_Down", "End", "Kpad1"),
        ];

        for (name, primary, secondary) in key_pairs {
            document.add_entry_to_section(
                KEY_DEFINITIONS_SECTION_NAME,
                Entry::new(
                    *name,
                    EntryValue::MultiString(vec![primary.to_string(), secondary.to_string()]),
                ),
            )?;
        }

        for weapon in 1..=10u32 {
            document.add_entry_to_section(
                KEY_DEFINITIONS_SECTION_NAME,
                Entry::new(
                    format!("Weapon_{weapon}"),
                    EntryValue::MultiString(vec![format!("{}", weapon % 10), String::new()]),
                ),
            )?;
        }

        let extra_keys: &[(&str, &str, &str)] = &[
            ("Inventory", "Enter", "KpdEnt"),
            ("Inventory_Left", "[", ""),
            ("Inventory_Right", "]", ""),
            ("Holo_Duke", "H", ""),
            ("Jetpack", "J", ""),
            ("NightVision", "N", ""),
            ("MedKit", "M", ""),
            ("TurnAround", "BakSpc", ""),
            ("SendMessage", "T", ""),
            ("Map", "Tab", ""),
            ("Shrink_Screen", "-", "Kpad-"),
            ("Enlarge_Screen", "=", "Kpad+"),
            ("Center_View", "KPad5", ""),
            ("Holster_Weapon", "ScrLck", ""),
            ("Show_Opponents_Weapon", "W", ""),
            ("Map_Follow_Mode", "F", ""),
            ("See_Coop_View", "K", ""),
            ("Mouse_Aiming", "U", ""),
            ("Toggle_Crosshair", "I", ""),
            ("Steroids", "R", ""),
            ("Quick_Kick", "`", ""),
            ("Next_Weapon", "'", ""),
            ("Previous_Weapon", ";", ""),
        ];

        for (name, primary, secondary) in extra_keys {
            document.add_entry_to_section(
                KEY_DEFINITIONS_SECTION_NAME,
                Entry::new(
                    *name,
                    EntryValue::MultiString(vec![primary.to_string(), secondary.to_string()]),
                ),
            )?;
        }

        // Controls
        document.add_section(
            Section::new(CONTROLS_SECTION_NAME)
                .with_preceding_comments(&[" ", " "])
                .with_following_comments(&[
                    " ",
                    " ",
                    "Controls",
                    " ",
                    "ControllerType",
                    " - Keyboard                  - 0",
                    " - Keyboard and Mouse        - 1",
                    " - Keyboard and Joystick     - 2",
                    " - Keyboard and Gamepad      - 4",
                    " - Keyboard and External     - 3",
                    " - Keyboard and FlightStick  - 5",
                    " - Keyboard and ThrustMaster - 6",
                    " ",
                    " ",
                ]),
        )?;

        document.add_entry_to_section(
            CONTROLS_SECTION_NAME,
            Entry::new("ControllerType", EntryValue::Integer(1)),
        )?;
        document.add_entry_to_section(
            CONTROLS_SECTION_NAME,
            Entry::new("JoystickPort", EntryValue::Integer(0)),
        )?;
        document.add_entry_to_section(
            CONTROLS_SECTION_NAME,
            Entry::new("MouseSensitivity", EntryValue::Integer(32768)),
        )?;
        document.add_entry_to_section(
            CONTROLS_SECTION_NAME,
            Entry::new("ExternalFilename", EntryValue::Str("EXTERNAL.EXE".into())),
        )?;
        document.add_entry_to_section(
            CONTROLS_SECTION_NAME,
            Entry::new("EnableRudder", EntryValue::Integer(0)),
        )?;
        document.add_entry_to_section(
            CONTROLS_SECTION_NAME,
            Entry::new("MouseAiming", EntryValue::Integer(0)),
        )?;

        if is_atomic {
            document.add_entry_to_section(
                CONTROLS_SECTION_NAME,
                Entry::new("MouseAimingFlipped", EntryValue::Integer(0)),
            )?;
        }

        let control_strings: &[(&str, &str)] = &[
            ("MouseButton0", "Fire"),
            ("MouseButtonClicked0", ""),
            ("MouseButton1", "Strafe"),
            ("MouseButtonClicked1", "Open"),
            ("MouseButton2", "Move_Forward"),
            ("MouseButtonClicked2", ""),
            ("JoystickButton0", "Fire"),
            ("JoystickButtonClicked0", ""),
            ("JoystickButton1", "Strafe"),
            ("JoystickButtonClicked1", "Inventory"),
            ("JoystickButton2", "Run"),
            ("JoystickButtonClicked2", "Jump"),
            ("JoystickButton3", "Open"),
            ("JoystickButtonClicked3", "Crouch"),
            ("JoystickButton4", "Aim_Down"),
            ("JoystickButtonClicked4", ""),
            ("JoystickButton5", "Look_Right"),
            ("JoystickButtonClicked5", ""),
            ("JoystickButton6", "Aim_Up"),
            ("JoystickButtonClicked6", ""),
            ("JoystickButton7", "Look_Left"),
            ("JoystickButtonClicked7", ""),
        ];

        for (name, value) in control_strings {
            document.add_entry_to_section(
                CONTROLS_SECTION_NAME,
                Entry::new(*name, EntryValue::Str(value.to_string())),
            )?;
        }

        for axis in 0..2u32 {
            let device = "Mouse";
            let analog = if axis == 0 { "analog_turning" } else { "analog_moving" };
            document.add_entry_to_section(
                CONTROLS_SECTION_NAME,
                Entry::new(
                    format!("{device}AnalogAxes{axis}"),
                    EntryValue::Str(analog.to_string()),
                ),
            )?;
            document.add_entry_to_section(
                CONTROLS_SECTION_NAME,
                Entry::new(format!("{device}DigitalAxes{axis}_0"), EntryValue::Str(String::new())),
            )?;
            document.add_entry_to_section(
                CONTROLS_SECTION_NAME,
                Entry::new(format!("{device}DigitalAxes{axis}_1"), EntryValue::Str(String::new())),
            )?;
            document.add_entry_to_section(
                CONTROLS_SECTION_NAME,
                Entry::new(format!("{device}AnalogScale{axis}"), EntryValue::Integer(65536)),
            )?;
        }

        let joystick_axes: &[(u32, &str, &str, &str)] = &[
            (0, "analog_turning", "", ""),
            (1, "analog_moving", "", ""),
            (2, "analog_strafing", "", ""),
            (3, "", "Run", ""),
        ];

        for (axis, analog, digital0, digital1) in joystick_axes {
            document.add_entry_to_section(
                CONTROLS_SECTION_NAME,
                Entry::new(
                    format!("JoystickAnalogAxes{axis}"),
                    EntryValue::Str(analog.to_string()),
                ),
            )?;
            document.add_entry_to_section(
                CONTROLS_SECTION_NAME,
                Entry::new(
                    format!("JoystickDigitalAxes{axis}_0"),
                    EntryValue::Str(digital0.to_string()),
                ),
            )?;
            document.add_entry_to_section(
                CONTROLS_SECTION_NAME,
                Entry::new(
                    format!("JoystickDigitalAxes{axis}_1"),
                    EntryValue::Str(digital1.to_string()),
                ),
            )?;
            document.add_entry_to_section(
                CONTROLS_SECTION_NAME,
                Entry::new(format!("JoystickAnalogScale{axis}"), EntryValue::Integer(65536)),
            )?;
        }

        let gamepad_axes: &[(&str, &str)] = &[
            ("GamePadDigitalAxes0_0", "Turn_Left"),
            ("GamePadDigitalAxes0_1", "Turn_Right"),
            ("GamePadDigitalAxes1_0", "Move_Forward"),
            ("GamePadDigitalAxes1_1", "Move_Backward"),
        ];

        for (name, value) in gamepad_axes {
            document.add_entry_to_section(
                CONTROLS_SECTION_NAME,
                Entry::new(*name, EntryValue::Str(value.to_string())),
            )?;
        }

        // Comm Setup
        document.add_section(
            Section::new(COMM_SETUP_SECTION_NAME)
                .with_preceding_comments(&[" ", " "])
                .with_following_comments(&[" ", " "]),
        )?;

        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("ComPort", EntryValue::Integer(2)),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("IrqNumber", EntryValue::Empty),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("UartAddress", EntryValue::Empty),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("PortSpeed", EntryValue::Integer(9600)),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("ToneDial", EntryValue::Integer(1)),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("SocketNumber", EntryValue::Empty),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("NumberPlayers", EntryValue::Integer(2)),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("ModemName", EntryValue::Str(String::new())),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("InitString", EntryValue::Str("ATZ".into())),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("HangupString", EntryValue::Str("ATH0=0".into())),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("DialoutString", EntryValue::Str(String::new())),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("PlayerName", EntryValue::Str("DUKE".into())),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("RTSName", EntryValue::Str("DUKE.RTS".into())),
        )?;

        if is_atomic {
            document.add_entry_to_section(
                COMM_SETUP_SECTION_NAME,
                Entry::new("RTSPath", EntryValue::Str(".\\".into())),
            )?;
            document.add_entry_to_section(
                COMM_SETUP_SECTION_NAME,
                Entry::new("UserPath", EntryValue::Str(".\\".into())),
            )?;
        }

        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("PhoneNumber", EntryValue::Str(String::new())),
        )?;
        document.add_entry_to_section(
            COMM_SETUP_SECTION_NAME,
            Entry::new("ConnectType", EntryValue::Integer(0)),
        )?;

        for (index, macro_text) in DEFAULT_COMBAT_MACROS.iter().enumerate() {
            document.add_entry_to_section(
                COMM_SETUP_SECTION_NAME,
                Entry::new(
                    format!("CommbatMacro#{index}"),
                    EntryValue::Str(macro_text.to_string()),
                ),
            )?;
        }

        let phone_entries = if is_atomic { 16 } else { 10 };

        for index in 0..phone_entries {
            document.add_entry_to_section(
                COMM_SETUP_SECTION_NAME,
                Entry::new(format!("PhoneName#{index}"), EntryValue::Str(String::new())),
            )?;
            document.add_entry_to_section(
                COMM_SETUP_SECTION_NAME,
                Entry::new(format!("PhoneNumber#{index}"), EntryValue::Str(String::new())),
            )?;
        }

        Ok(document)
    }

    /// Retarget an existing configuration to sensible DOSBox-hosted
    /// defaults: SVGA 800x600, shadows on, 16-bit mixing at the
    /// version-appropriate rate, all sound toggles enabled.
    ///
    /// An unrecognized `SetupVersion` is assumed to be the Atomic Edition
    /// with a warning.
    pub fn update_for_dosbox(&mut self) -> Result<(), GameConfigError> {
        let setup_version = self
            .section_with_name(SETUP_SECTION_NAME)
            .and_then(|section| section.entry_with_name(SETUP_VERSION_ENTRY_NAME))
            .and_then(|entry| entry.value.as_str().map(str::to_string))
            .ok_or_else(|| {
                GameConfigError::Integrity(format!(
                    "missing string entry '{SETUP_VERSION_ENTRY_NAME}' in section '{SETUP_SECTION_NAME}'"
                ))
            })?;

        let is_atomic = if setup_version.eq_ignore_ascii_case(REGULAR_VERSION_SETUP_VERSION) {
            false
        } else if setup_version.eq_ignore_ascii_case(ATOMIC_EDITION_SETUP_VERSION) {
            true
        } else {
            tracing::warn!(
                "unexpected setup version '{setup_version}', expected '{REGULAR_VERSION_SETUP_VERSION}' or \
                 '{ATOMIC_EDITION_SETUP_VERSION}'; assuming Atomic Edition / Plutonium Pak"
            );
            true
        };

        if !self.has_section_with_name(SCREEN_SETUP_SECTION_NAME)
            || !self.has_section_with_name(SOUND_SETUP_SECTION_NAME)
        {
            return Err(GameConfigError::Integrity(
                "configuration is missing the screen or sound setup section".to_string(),
            ));
        }

        let screen = SCREEN_SETUP_SECTION_NAME;
        self.set_entry_value(screen, SCREEN_MODE_ENTRY_NAME, EntryValue::Integer(1), true)?;
        self.set_entry_value(screen, SCREEN_WIDTH_ENTRY_NAME, EntryValue::Integer(800), true)?;
        self.set_entry_value(screen, SCREEN_HEIGHT_ENTRY_NAME, EntryValue::Integer(600), true)?;
        self.set_entry_value(screen, "Shadows", EntryValue::Integer(1), true)?;

        if is_atomic {
            self.set_entry_value(screen, "Password", EntryValue::Str(String::new()), true)?;
        } else {
            self.set_entry_value(screen, "Environment", EntryValue::Str(String::new()), true)?;
        }

        self.set_entry_value(screen, "Detail", EntryValue::Integer(1), true)?;
        self.set_entry_value(screen, "Tilt", EntryValue::Integer(1), true)?;
        self.set_entry_value(screen, "Messages", EntryValue::Integer(1), true)?;
        self.set_entry_value(screen, "Out", EntryValue::Integer(0), true)?;
        self.set_entry_value(screen, "ScreenSize", EntryValue::Integer(4), true)?;
        self.set_entry_value(screen, "ScreenGamma", EntryValue::Integer(0), true)?;

        let sound = SOUND_SETUP_SECTION_NAME;
        self.set_entry_value(sound, FX_DEVICE_ENTRY_NAME, EntryValue::Integer(0), true)?;
        self.set_entry_value(sound, MUSIC_DEVICE_ENTRY_NAME, EntryValue::Integer(0), true)?;
        self.set_entry_value(sound, NUM_BITS_ENTRY_NAME, EntryValue::Integer(16), true)?;
        self.set_entry_value(
            sound,
            MIX_RATE_ENTRY_NAME,
            EntryValue::Integer(if is_atomic { 44000 } else { 22000 }),
            true,
        )?;
        self.set_entry_value(sound, "SoundToggle", EntryValue::Integer(1), true)?;
        self.set_entry_value(sound, "VoiceToggle", EntryValue::Integer(1), true)?;
        self.set_entry_value(sound, "AmbienceToggle", EntryValue::Integer(1), true)?;
        self.set_entry_value(sound, "MusicToggle", EntryValue::Integer(1), true)?;

        Ok(())
    }
}
