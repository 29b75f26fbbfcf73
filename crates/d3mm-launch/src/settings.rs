//! Read-only launcher settings.
//!
//! Loaded and persisted elsewhere; the orchestrator only consumes the
//! values. No environment variables are read here.

use std::path::PathBuf;

/// Flat settings snapshot handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Cache of downloaded mod files, one subdirectory per engine
    /// (`<mods>/<GameVersion::mod_directory_name>`).
    pub mods_directory_path: PathBuf,

    /// User map directory exposed to engines through the maps symlink.
    pub maps_directory_path: PathBuf,

    /// Application data directory holding the DOSBox script templates.
    pub data_directory_path: PathBuf,

    pub dosbox_directory_path: PathBuf,
    pub dosbox_executable_file_name: String,

    /// Extra arguments inserted after the DOSBox executable.
    pub dosbox_arguments: String,

    /// Subdirectory of the data directory holding DOSBox script files.
    pub dosbox_data_directory_name: String,

    pub dosbox_game_script_file_name: String,
    pub dosbox_setup_script_file_name: String,
    pub dosbox_client_script_file_name: String,
    pub dosbox_server_script_file_name: String,

    /// Name of the symlink created in the game directory pointing at the
    /// mods directory.
    pub mods_symlink_name: String,

    /// Name of the symlink created in the game directory pointing at the
    /// maps directory.
    pub maps_symlink_name: String,

    pub dosbox_server_ip_address: String,
    pub dosbox_local_server_port: u16,
    pub dosbox_remote_server_port: u16,

    /// Skip all remote catalog and download traffic.
    pub local_mode: bool,

    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mods_directory_path: PathBuf::from("mods"),
            maps_directory_path: PathBuf::from("maps"),
            data_directory_path: PathBuf::from("data"),
            dosbox_directory_path: PathBuf::from("dosbox"),
            dosbox_executable_file_name: "dosbox".to_string(),
            dosbox_arguments: "-noconsole".to_string(),
            dosbox_data_directory_name: "DOSBox".to_string(),
            dosbox_game_script_file_name: "duke3d.script".to_string(),
            dosbox_setup_script_file_name: "duke3d_setup.script".to_string(),
            dosbox_client_script_file_name: "duke3d_client.script".to_string(),
            dosbox_server_script_file_name: "duke3d_server.script".to_string(),
            mods_symlink_name: "DUKE3DMODS".to_string(),
            maps_symlink_name: "DUKE3DMAPS".to_string(),
            dosbox_server_ip_address: "127.0.0.1".to_string(),
            dosbox_local_server_port: 31337,
            dosbox_remote_server_port: 31337,
            local_mode: false,
            verbose: false,
        }
    }
}

impl Settings {
    /// Directory holding the DOSBox script templates.
    pub fn dosbox_data_directory_path(&self) -> PathBuf {
        self.data_directory_path.join(&self.dosbox_data_directory_name)
    }

    /// Full path of the DOSBox executable.
    pub fn dosbox_executable_path(&self) -> PathBuf {
        self.dosbox_directory_path.join(&self.dosbox_executable_file_name)
    }
}
