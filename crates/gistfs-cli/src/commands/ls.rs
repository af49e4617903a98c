//! `ls` command: list the files of a gist.

use super::common::{EntryView, GistOptions, Listing, open_gist};
use crate::cli::{ExitCode, OutputFormat};
use crate::config::Config;
use crate::formatters::format_output;
use anyhow::Result;
use gistfs::{File, GistFs};
use tracing::debug;

/// Entries fetched per `read_dir` call.
pub const PAGE_SIZE: isize = 64;

/// Lists every entry by paging the root directory handle.
///
/// # Errors
///
/// Returns an error if the root cannot be opened or read.
pub fn list(fs: &GistFs) -> Result<Listing> {
    let root = fs.open(".")?;
    let mut entries = Vec::with_capacity(fs.len());

    loop {
        let page = root.read_dir(PAGE_SIZE)?;
        if page.is_empty() {
            break;
        }
        debug!("Read {} directory entries", page.len());
        entries.extend(page.iter().map(|entry| EntryView::from(&entry.info())));
    }

    root.close()?;
    Ok(Listing(entries))
}

/// Runs the `ls` command.
///
/// # Errors
///
/// Returns an error if the gist cannot be loaded or listed.
pub async fn run(
    gist_id: &str,
    options: &GistOptions,
    config: &Config,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let fs = open_gist(gist_id, options, config).await?;
    let listing = list(&fs)?;

    if let Some(output) = render(&listing, output_format)? {
        println!("{output}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Formats `listing`, or returns `None` when there is nothing to print.
///
/// An empty listing prints nothing in text and pretty modes, but JSON
/// always yields a document (`[]`).
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(listing: &Listing, output_format: OutputFormat) -> Result<Option<String>> {
    if listing.0.is_empty() && output_format != OutputFormat::Json {
        return Ok(None);
    }
    format_output(listing, output_format).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::test_support::loaded_fs;

    #[tokio::test]
    async fn test_list_in_name_order() {
        let fs = loaded_fs(&[("b.txt", "bye"), ("a.txt", "hi")]).await;
        let listing = list(&fs).unwrap();

        let names: Vec<_> = listing.0.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
        assert_eq!(listing.0[1].size, 3);
    }

    #[tokio::test]
    async fn test_list_spans_several_pages() {
        let names: Vec<String> = (0..150).map(|i| format!("f{i:03}")).collect();
        let files: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "x")).collect();
        let fs = loaded_fs(&files).await;

        let listing = list(&fs).unwrap();
        assert_eq!(listing.0.len(), 150);
        assert_eq!(listing.0[0].name, "f000");
        assert_eq!(listing.0[149].name, "f149");
    }

    #[tokio::test]
    async fn test_list_empty_gist() {
        let fs = loaded_fs(&[]).await;
        assert!(list(&fs).unwrap().0.is_empty());
    }

    #[tokio::test]
    async fn test_render_empty_gist() {
        let listing = list(&loaded_fs(&[]).await).unwrap();

        let json = render(&listing, OutputFormat::Json).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!([]));
        assert!(render(&listing, OutputFormat::Text).unwrap().is_none());
        assert!(render(&listing, OutputFormat::Pretty).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_text_output() {
        let fs = loaded_fs(&[("a.txt", "hi"), ("b.txt", "bye")]).await;
        let output = format_output(&list(&fs).unwrap(), OutputFormat::Text).unwrap();

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("-r--r--r--"));
        assert!(lines[0].ends_with(" a.txt"));
    }

    #[tokio::test]
    async fn test_list_json_output() {
        let fs = loaded_fs(&[("a.txt", "hi")]).await;
        let output = format_output(&list(&fs).unwrap(), OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["name"], "a.txt");
        assert_eq!(value[0]["size"], 2);
        assert_eq!(value[0]["is_dir"], false);
    }
}
