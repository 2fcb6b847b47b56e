//! User-facing reply text. The transport adapter only delivers these.

use crate::fetch::FetchError;

pub const UNAUTHORIZED: &str = "You are not authorized to send files to this bot.";
pub const SEND_FILE_OR_LINK: &str = "Please send a file or a link.";
pub const LINK_RESOLVE_FAILED: &str = "An error occurred while retrieving the file link.";

pub fn welcome(active_folder: &str) -> String {
    format!(
        "Welcome! Send me a file or a link (or several links separated by commas) \
and I will save it. Current folder: {active_folder}."
    )
}

pub fn folder_switched(folder: &str) -> String {
    format!("Folder switched to {folder}.")
}

pub fn download_started(filename: &str, remaining: usize) -> String {
    if remaining == 0 {
        format!("Start download file {filename}")
    } else {
        format!("Start download file {filename} ({remaining} more in queue)")
    }
}

pub fn download_saved(filename: &str) -> String {
    format!("File successfully saved: {filename}")
}

pub fn download_failed(err: &FetchError) -> &'static str {
    match err {
        FetchError::Transport(_) | FetchError::Http(_) => {
            "An error occurred while downloading the file."
        }
        FetchError::Write(_) => "An error occurred while saving the file.",
    }
}
