//! Deterministic storage sharding
//!
//! Flat image names are spread over a bounded two-level directory tree
//! derived from the name's leading characters, so a large corpus never
//! piles up in one directory while paths stay human-traceable by filename
//! prefix. The output is part of the persisted key format: changing this
//! function strands every previously written key.

const FIRST_FOLDER_LEN: usize = 4;
const SECOND_FOLDER_LEN: usize = 4;
const SLASH: &str = "/";

/// Compute the shard path segment for a file name.
///
/// The trailing extension is ignored. Names of 4 characters or fewer get
/// the root separator; up to 8 characters get one folder of the first 4
/// characters lower-cased; anything longer also gets a second folder of
/// characters 4..8. Characters past position 8 never influence the result.
pub fn shard_path(file_name: &str) -> String {
    let stem = cut_extension(file_name);
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() <= FIRST_FOLDER_LEN {
        return SLASH.to_string();
    }
    let first: String = chars[..FIRST_FOLDER_LEN].iter().collect::<String>().to_lowercase();
    if chars.len() <= FIRST_FOLDER_LEN + SECOND_FOLDER_LEN {
        return format!("{SLASH}{first}{SLASH}");
    }
    let second: String = chars[FIRST_FOLDER_LEN..FIRST_FOLDER_LEN + SECOND_FOLDER_LEN]
        .iter()
        .collect::<String>()
        .to_lowercase();
    format!("{SLASH}{first}{SLASH}{second}{SLASH}")
}

fn cut_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) => &file_name[..index],
        None => file_name,
    }
}
