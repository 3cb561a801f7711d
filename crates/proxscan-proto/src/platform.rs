use std::path::PathBuf;

const APP_DIR: &str = "proxscan";

pub fn data_dir() -> PathBuf {
    // Kiosk images run as a plain user without XDG variables set, so build
    // ~/.local/share/proxscan directly instead of asking `dirs` for it.
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }
    #[cfg(not(unix))]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }

    #[cfg(not(unix))]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

/// Default location of the discovered-devices document.
pub fn discovered_file() -> PathBuf {
    data_dir().join("discovered_devices.json")
}

/// Default location of the lab-devices document.
pub fn lab_file() -> PathBuf {
    data_dir().join("lab_devices.json")
}

/// Log file written by the tracing subscriber.
pub fn log_file() -> PathBuf {
    data_dir().join("proxscan.log")
}
