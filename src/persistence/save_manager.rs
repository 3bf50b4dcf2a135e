use super::error::SaveError;
use super::save_data::{LoadReport, SaveData};
use crate::core::constants::SAVE_VERSION_MAGIC;
use crate::core::GameState;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const HEADER_LEN: u64 = 8 + 4;
const CHECKSUM_LEN: u64 = 32;

/// Somewhere a snapshot can be kept between sessions.
pub trait SaveStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<SaveData>, SaveError>;

    fn save(&mut self, data: &SaveData) -> Result<(), SaveError>;
}

/// Checksummed save file under the platform config directory.
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Save file at `<config dir>/squares/save.dat`, creating the directory.
    pub fn new() -> Result<Self, SaveError> {
        let project_dirs = ProjectDirs::from("", "", "squares").ok_or(SaveError::NoSaveDir)?;

        let config_dir = project_dirs.config_dir();
        fs::create_dir_all(config_dir)?;

        Ok(Self {
            save_path: config_dir.join("save.dat"),
        })
    }

    /// Save file at an explicit path. The parent directory must exist.
    pub fn at_path(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.save_path
    }

    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    /// Removes the save file. Missing files are not an error.
    pub fn delete(&self) -> Result<(), SaveError> {
        match fs::remove_file(&self.save_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SaveStore for SaveManager {
    /// File format:
    /// - Version magic (8 bytes, LE)
    /// - Payload length (4 bytes, LE)
    /// - JSON payload
    /// - SHA256 over the three fields above (32 bytes)
    fn save(&mut self, data: &SaveData) -> Result<(), SaveError> {
        let payload = serde_json::to_vec(data)?;
        let payload_len = payload.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(payload_len.to_le_bytes());
        hasher.update(&payload);
        let checksum = hasher.finalize();

        let mut file = fs::File::create(&self.save_path)?;
        file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
        file.write_all(&payload_len.to_le_bytes())?;
        file.write_all(&payload)?;
        file.write_all(&checksum)?;

        debug!(path = %self.save_path.display(), bytes = payload.len(), "saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveData>, SaveError> {
        let mut file = match fs::File::open(&self.save_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);
        if version != SAVE_VERSION_MAGIC {
            return Err(SaveError::BadVersion {
                expected: SAVE_VERSION_MAGIC,
                found: version,
            });
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let payload_len = u32::from_le_bytes(length_bytes);

        let available = file.metadata()?.len().saturating_sub(HEADER_LEN + CHECKSUM_LEN);
        if u64::from(payload_len) > available {
            return Err(SaveError::BadLength {
                declared: payload_len,
                available,
            });
        }

        let mut payload = vec![0u8; payload_len as usize];
        file.read_exact(&mut payload)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&payload);
        if stored_checksum != hasher.finalize().as_slice() {
            return Err(SaveError::ChecksumMismatch);
        }

        Ok(Some(serde_json::from_slice(&payload)?))
    }
}

/// Keeps the last snapshot in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub data: Option<SaveData>,
    pub saves: u32,
}

impl SaveStore for MemoryStore {
    fn load(&self) -> Result<Option<SaveData>, SaveError> {
        Ok(self.data.clone())
    }

    fn save(&mut self, data: &SaveData) -> Result<(), SaveError> {
        self.data = Some(data.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Loads the stored game, or a fresh one at `now` if there is nothing usable.
pub fn load_or_default(store: &impl SaveStore, now: i64) -> (GameState, LoadReport) {
    let data = match store.load() {
        Ok(Some(data)) => data,
        Ok(None) => {
            info!("no save found, starting a new game");
            return (GameState::new(now), LoadReport::default());
        }
        Err(e) => {
            warn!(error = %e, "could not read save, starting a new game");
            return (GameState::new(now), LoadReport::default());
        }
    };

    match data.into_state(now) {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!(error = %e, "save predates the current format, starting a new game");
            (GameState::new(now), LoadReport::default())
        }
    }
}

/// Snapshots `state` at `now` into `store`.
pub fn save_game(store: &mut impl SaveStore, state: &GameState, now: i64) -> Result<(), SaveError> {
    store.save(&SaveData::from_state(state, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::UpgradeId;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn new_for_test() -> SaveManager {
        let test_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "squares-test-{}-{}",
            std::process::id(),
            test_id
        ));
        fs::create_dir_all(&dir).expect("Failed to create test directory");
        SaveManager::at_path(dir.join("save.dat"))
    }

    #[test]
    fn test_save_and_load() {
        let mut manager = new_for_test();
        let mut state = GameState::new(1_000);
        state.currency = 55.0;
        state.upgrades.insert(UpgradeId::ManaGem, 2);
        state.unlocked_upgrades.insert(UpgradeId::ManaGem);

        save_game(&mut manager, &state, 2_000).expect("Failed to save");
        assert!(manager.save_exists());

        let (loaded, _) = load_or_default(&manager, 9_000);
        assert_eq!(loaded, state);

        manager.delete().expect("Failed to delete save");
    }

    #[test]
    fn test_load_nonexistent_is_none() {
        let manager = new_for_test();
        assert!(manager.load().expect("missing file is not an error").is_none());
        let (state, _) = load_or_default(&manager, 42);
        assert_eq!(state, GameState::new(42));
    }

    #[test]
    fn test_tampered_payload_fails_checksum() {
        let mut manager = new_for_test();
        save_game(&mut manager, &GameState::new(0), 0).unwrap();

        let mut bytes = fs::read(manager.path()).unwrap();
        bytes[14] ^= 0xFF;
        fs::write(manager.path(), &bytes).unwrap();

        assert!(matches!(manager.load(), Err(SaveError::ChecksumMismatch)));
        let (state, _) = load_or_default(&manager, 7);
        assert_eq!(state, GameState::new(7));
    }

    #[test]
    fn test_wrong_magic_is_rejected() {
        let mut manager = new_for_test();
        save_game(&mut manager, &GameState::new(0), 0).unwrap();

        let mut bytes = fs::read(manager.path()).unwrap();
        bytes[0] ^= 0x01;
        fs::write(manager.path(), &bytes).unwrap();

        assert!(matches!(
            manager.load(),
            Err(SaveError::BadVersion { expected, .. }) if expected == SAVE_VERSION_MAGIC
        ));
    }

    #[test]
    fn test_oversized_length_header_is_rejected() {
        let mut manager = new_for_test();
        save_game(&mut manager, &GameState::new(0), 0).unwrap();

        let mut bytes = fs::read(manager.path()).unwrap();
        bytes[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
        fs::write(manager.path(), &bytes).unwrap();

        assert!(matches!(
            manager.load(),
            Err(SaveError::BadLength { declared: u32::MAX, .. })
        ));
        let (state, _) = load_or_default(&manager, 9);
        assert_eq!(state, GameState::new(9));
    }

    #[test]
    fn test_truncated_file_is_io_error() {
        let manager = new_for_test();
        fs::write(manager.path(), [1u8, 2, 3]).unwrap();
        assert!(matches!(manager.load(), Err(SaveError::Io(_))));
    }

    #[test]
    fn test_delete_missing_file_is_ok() {
        let manager = new_for_test();
        assert!(manager.delete().is_ok());
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryStore::default();
        save_game(&mut store, &GameState::new(0), 0).unwrap();
        save_game(&mut store, &GameState::new(0), 100).unwrap();
        assert_eq!(store.saves, 2);
        assert_eq!(store.data.as_ref().and_then(|d| d.timestamp), Some(100));
    }

    #[test]
    fn test_pre_layer_save_starts_fresh() {
        let store = MemoryStore {
            data: Some(SaveData {
                currency: 99.0,
                ..SaveData::default()
            }),
            saves: 0,
        };
        let (state, _) = load_or_default(&store, 3);
        assert_eq!(state, GameState::new(3));
    }
}
