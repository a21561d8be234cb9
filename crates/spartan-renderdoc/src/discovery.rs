//! Locating an installed RenderDoc library on disk.
//!
//! Each platform exposes a catalog of directories that may hold the library; discovery keeps the
//! ones that actually contain it, in the order the catalog reported them.

use std::{env, path::PathBuf};

use crate::CaptureToolError;

/// File name of the RenderDoc in-application library on this platform.
#[cfg(windows)]
pub const LIBRARY_FILE_NAME: &str = "renderdoc.dll";
#[cfg(not(windows))]
pub const LIBRARY_FILE_NAME: &str = "librenderdoc.so";

/// Environment variable naming a RenderDoc install directory to try before anything else. On
/// Linux its `lib` subdirectory is tried first.
pub const INSTALL_DIR_ENV: &str = "SPARTAN_RENDERDOC_DIR";

const INSTALLER_FOLDER_MARKER: &str = "RenderDoc";

/// Source of candidate install directories.
pub trait InstallCatalog {
    /// Whether this platform has any way of finding an installation.
    fn is_supported(&self) -> bool;

    /// Directories that may contain [`LIBRARY_FILE_NAME`], most preferred first.
    fn candidate_dirs(&self) -> Vec<PathBuf>;
}

/// Returns the full path of every catalog directory that contains the library.
pub fn discover_library_paths<C: InstallCatalog + ?Sized>(catalog: &C) -> Vec<PathBuf> {
    if !catalog.is_supported() {
        tracing::debug!("RenderDoc install discovery is not supported on this platform");
        return Vec::new();
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for dir in catalog.candidate_dirs() {
        let candidate = dir.join(LIBRARY_FILE_NAME);
        if !candidate.is_file() {
            tracing::trace!(dir = %dir.display(), "no RenderDoc library in directory");
            continue;
        }
        if !paths.contains(&candidate) {
            paths.push(candidate);
        }
    }
    paths
}

/// Picks the library to load from the discovered paths.
///
/// Always the first entry. The Windows installer catalog reports the 64-bit install first in
/// practice, but enumeration order is not guaranteed by the registry.
pub fn select_library_path(paths: Vec<PathBuf>) -> Result<PathBuf, CaptureToolError> {
    let mut paths = paths.into_iter();
    let selected = paths.next().ok_or(CaptureToolError::ToolNotInstalled)?;
    for ignored in paths {
        tracing::debug!(path = %ignored.display(), "ignoring additional RenderDoc install");
    }
    Ok(selected)
}

/// Keeps installer folder records that belong to RenderDoc.
///
/// Many qualify, e.g. `C:\Program Files\RenderDoc\`, `C:\Program Files\RenderDoc\plugins\amd\counters\`
/// and the start menu folder; [`discover_library_paths`] later drops the ones without the library.
pub fn filter_installer_folders<I>(folders: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = String>,
{
    folders
        .into_iter()
        .filter(|folder| folder.contains(INSTALLER_FOLDER_MARKER))
        .map(PathBuf::from)
        .collect()
}

#[cfg(any(windows, target_os = "linux"))]
fn install_dir_override() -> Option<PathBuf> {
    env::var_os(INSTALL_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Catalog for platforms RenderDoc cannot be discovered on.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedCatalog;

impl UnsupportedCatalog {
    pub fn from_env() -> Self {
        Self
    }
}

impl InstallCatalog for UnsupportedCatalog {
    fn is_supported(&self) -> bool {
        false
    }

    fn candidate_dirs(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// Windows Installer folder records (`HKLM\...\Installer\Folders`).
#[cfg(windows)]
#[derive(Clone, Debug, Default)]
pub struct InstallerFolderCatalog {
    override_dir: Option<PathBuf>,
}

#[cfg(windows)]
impl InstallerFolderCatalog {
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        Self { override_dir }
    }

    pub fn from_env() -> Self {
        Self::new(install_dir_override())
    }
}

#[cfg(windows)]
impl InstallCatalog for InstallerFolderCatalog {
    fn is_supported(&self) -> bool {
        true
    }

    fn candidate_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self.override_dir.iter().cloned().collect();
        match registry::installer_folders() {
            Ok(folders) => dirs.extend(filter_installer_folders(folders)),
            Err(e) => tracing::warn!(error = %e, "failed to read Windows Installer folders"),
        }
        dirs
    }
}

#[cfg(windows)]
mod registry {
    use std::{ffi::OsString, io, os::windows::ffi::OsStringExt, ptr};

    use windows_sys::Win32::{
        Foundation::ERROR_SUCCESS,
        System::Registry::{
            HKEY, HKEY_LOCAL_MACHINE, KEY_READ, REG_SZ, RegCloseKey, RegEnumValueW,
            RegOpenKeyExW, RegQueryInfoKeyW,
        },
    };

    const INSTALLER_FOLDERS_KEY: &str =
        r"SOFTWARE\Microsoft\Windows\CurrentVersion\Installer\Folders";

    struct Key(HKEY);

    impl Drop for Key {
        fn drop(&mut self) {
            unsafe { RegCloseKey(self.0) };
        }
    }

    /// Names of the `REG_SZ` values under the installer folders key. Each name is a folder path.
    pub(super) fn installer_folders() -> io::Result<Vec<String>> {
        let subkey: Vec<u16> = INSTALLER_FOLDERS_KEY
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect();

        let mut hkey: HKEY = 0;
        let status =
            unsafe { RegOpenKeyExW(HKEY_LOCAL_MACHINE, subkey.as_ptr(), 0, KEY_READ, &mut hkey) };
        if status != ERROR_SUCCESS {
            return Err(io::Error::from_raw_os_error(status as i32));
        }
        let key = Key(hkey);

        let mut value_count = 0u32;
        let mut max_name_len = 0u32;
        let status = unsafe {
            RegQueryInfoKeyW(
                key.0,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                &mut value_count,
                &mut max_name_len,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        if status != ERROR_SUCCESS {
            return Err(io::Error::from_raw_os_error(status as i32));
        }

        // The reported maximum excludes the terminating nul.
        let mut name = vec![0u16; max_name_len as usize + 1];
        let mut folders = Vec::with_capacity(value_count as usize);
        for index in 0..value_count {
            let mut name_len = name.len() as u32;
            let mut kind = 0u32;
            let status = unsafe {
                RegEnumValueW(
                    key.0,
                    index,
                    name.as_mut_ptr(),
                    &mut name_len,
                    ptr::null(),
                    &mut kind,
                    ptr::null_mut(),
                    ptr::null_mut(),
                )
            };
            if status != ERROR_SUCCESS || kind != REG_SZ {
                continue;
            }
            let folder = OsString::from_wide(&name[..name_len as usize]);
            folders.push(folder.to_string_lossy().into_owned());
        }

        Ok(folders)
    }
}

/// Linux library search path: the override directory, `LD_LIBRARY_PATH`, then the usual
/// distribution and `/opt` install locations.
///
/// The override may name either the install root (the release tarball keeps the library in
/// `<root>/lib`) or the directory holding the library itself.
#[cfg(target_os = "linux")]
#[derive(Clone, Debug, Default)]
pub struct LibrarySearchCatalog {
    override_dir: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
}

#[cfg(target_os = "linux")]
const DEFAULT_LIBRARY_DIRS: [&str; 6] = [
    "/usr/lib",
    "/usr/lib64",
    "/usr/lib/x86_64-linux-gnu",
    "/usr/local/lib",
    "/opt/renderdoc/lib",
    "/opt/RenderDoc/lib",
];

#[cfg(target_os = "linux")]
impl LibrarySearchCatalog {
    pub fn new(override_dir: Option<PathBuf>, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            override_dir,
            search_dirs,
        }
    }

    pub fn from_env() -> Self {
        let mut search_dirs: Vec<PathBuf> = env::var_os("LD_LIBRARY_PATH")
            .map(|v| env::split_paths(&v).collect())
            .unwrap_or_default();
        search_dirs.extend(DEFAULT_LIBRARY_DIRS.into_iter().map(PathBuf::from));
        Self::new(install_dir_override(), search_dirs)
    }
}

#[cfg(target_os = "linux")]
impl InstallCatalog for LibrarySearchCatalog {
    fn is_supported(&self) -> bool {
        true
    }

    fn candidate_dirs(&self) -> Vec<PathBuf> {
        let override_dirs = self
            .override_dir
            .iter()
            .flat_map(|root| [root.join("lib"), root.clone()]);
        override_dirs
            .chain(self.search_dirs.iter().cloned())
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect()
    }
}

#[cfg(windows)]
pub type SystemCatalog = InstallerFolderCatalog;

#[cfg(target_os = "linux")]
pub type SystemCatalog = LibrarySearchCatalog;

#[cfg(not(any(windows, target_os = "linux")))]
pub type SystemCatalog = UnsupportedCatalog;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCatalog, install_library};

    #[test]
    fn directories_without_the_library_are_excluded() {
        let with = tempfile::tempdir().unwrap();
        let without = tempfile::tempdir().unwrap();
        let installed = install_library(with.path());

        let catalog = FakeCatalog {
            dirs: vec![without.path().to_path_buf(), with.path().to_path_buf()],
            ..Default::default()
        };
        assert_eq!(discover_library_paths(&catalog), vec![installed]);
    }

    #[test]
    fn catalog_order_is_preserved_and_duplicates_dropped() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let first_lib = install_library(first.path());
        let second_lib = install_library(second.path());

        let catalog = FakeCatalog {
            dirs: vec![
                first.path().to_path_buf(),
                second.path().to_path_buf(),
                first.path().to_path_buf(),
            ],
            ..Default::default()
        };
        assert_eq!(discover_library_paths(&catalog), vec![first_lib, second_lib]);
    }

    #[test]
    fn unsupported_catalog_discovers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        install_library(dir.path());
        let catalog = FakeCatalog {
            unsupported: true,
            dirs: vec![dir.path().to_path_buf()],
        };
        assert!(discover_library_paths(&catalog).is_empty());
        assert!(discover_library_paths(&UnsupportedCatalog).is_empty());
    }

    #[test]
    fn first_path_is_selected() {
        let paths = vec![
            PathBuf::from(r"C:\ProgramData\Microsoft\Windows\Start Menu\Programs\RenderDoc\renderdoc.dll"),
            PathBuf::from(r"C:\Program Files\RenderDoc\renderdoc.dll"),
        ];
        assert_eq!(select_library_path(paths.clone()).unwrap(), paths[0]);
    }

    #[test]
    fn selecting_from_nothing_means_not_installed() {
        assert_eq!(
            select_library_path(Vec::new()).unwrap_err(),
            CaptureToolError::ToolNotInstalled
        );
    }

    #[test]
    fn installer_folders_are_filtered_by_name() {
        let folders = vec![
            r"C:\Program Files\RenderDoc\plugins\amd\counters\".to_string(),
            r"C:\Program Files\Vulkan SDK\Bin\".to_string(),
            r"C:\Program Files\RenderDoc\".to_string(),
            r"C:\Program Files\renderdoc-old\".to_string(),
        ];
        assert_eq!(
            filter_installer_folders(folders),
            vec![
                PathBuf::from(r"C:\Program Files\RenderDoc\plugins\amd\counters\"),
                PathBuf::from(r"C:\Program Files\RenderDoc\"),
            ]
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn override_directory_is_searched_first() {
        let override_dir = tempfile::tempdir().unwrap();
        let system_dir = tempfile::tempdir().unwrap();
        let override_lib = install_library(override_dir.path());
        let system_lib = install_library(system_dir.path());

        let catalog = LibrarySearchCatalog::new(
            Some(override_dir.path().to_path_buf()),
            vec![PathBuf::new(), system_dir.path().to_path_buf()],
        );
        assert_eq!(
            catalog.candidate_dirs(),
            vec![
                override_dir.path().join("lib"),
                override_dir.path().to_path_buf(),
                system_dir.path().to_path_buf()
            ]
        );
        assert_eq!(discover_library_paths(&catalog), vec![override_lib, system_lib]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn override_install_root_finds_the_lib_subdirectory() {
        let root = tempfile::tempdir().unwrap();
        let lib_dir = root.path().join("lib");
        std::fs::create_dir(&lib_dir).unwrap();
        let library = install_library(&lib_dir);

        let catalog = LibrarySearchCatalog::new(Some(root.path().to_path_buf()), Vec::new());

        assert_eq!(discover_library_paths(&catalog), vec![library]);
    }

    #[test]
    fn matching_installer_folder_without_the_library_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        let install = root.path().join("RenderDoc");
        let counters = install.join("plugins").join("RenderDoc-counters");
        let unrelated = root.path().join("Vulkan SDK");
        for dir in [&install, &counters, &unrelated] {
            std::fs::create_dir_all(dir).unwrap();
        }
        let library = install_library(&install);
        install_library(&unrelated);

        let folders = [&counters, &unrelated, &install]
            .into_iter()
            .map(|dir| dir.to_string_lossy().into_owned());
        let catalog = FakeCatalog {
            dirs: filter_installer_folders(folders),
            ..Default::default()
        };

        assert_eq!(catalog.dirs.len(), 2);
        assert_eq!(discover_library_paths(&catalog), vec![library]);
    }
}
