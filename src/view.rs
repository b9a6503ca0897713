//! Text rendering of the gallery and the uploader for the terminal front end.

use std::fmt::Write as _;

use console::style;

use crate::{collection::Snapshot, ingest, record::ArtworkRecord, uploader::UploaderState};

fn image_summary(image_data: &str) -> String {
    let Ok(url) = data_url::DataUrl::process(image_data) else {
        return "external image".into();
    };
    let mime = url.mime_type();
    match ingest::decode(image_data) {
        Ok(body) => format!("{}/{}, {} bytes", mime.type_, mime.subtype, body.len()),
        Err(_) => format!("{}/{}, undecodable", mime.type_, mime.subtype),
    }
}

pub fn render_record(out: &mut String, record: &ArtworkRecord) {
    let _ = writeln!(
        out,
        "{} {}",
        style(&record.title).bold(),
        style(format!("[{}]", record.id)).dim()
    );
    if let Some(artist) = record.artist.as_deref().filter(|a| !a.is_empty()) {
        let _ = writeln!(out, "  by {artist}");
    }
    if let Some(description) = record.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "  {description}");
    }
    if !record.tags.is_empty() {
        let chips = record
            .tags
            .iter()
            .map(|tag| format!("#{tag}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "  {}", style(chips).cyan());
    }
    let _ = writeln!(out, "  ({})", image_summary(&record.image_data));
}

pub fn render_collection(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    if snapshot.loading {
        let _ = writeln!(out, "{}", style("Loading gallery…").yellow());
        return out;
    }
    if snapshot.items.is_empty() {
        let _ = writeln!(out, "The gallery is empty.");
        return out;
    }
    for record in snapshot.items.iter() {
        render_record(&mut out, record);
    }
    out
}

pub fn render_uploader(state: &UploaderState) -> String {
    let (label, draft) = match state {
        UploaderState::Idle => return "Uploader closed.\n".into(),
        UploaderState::Editing(draft) => ("Editing", draft),
        UploaderState::Submitting(draft) => ("Uploading", draft),
    };
    let mut out = String::new();
    let _ = writeln!(out, "{}", style(label).bold());
    let _ = writeln!(out, "  title: {}", draft.title);
    let _ = writeln!(out, "  artist: {}", draft.artist);
    let _ = writeln!(out, "  description: {}", draft.description);
    let _ = writeln!(out, "  tags: {}", draft.tags_raw);
    if draft.image_data.is_empty() {
        let _ = writeln!(out, "  image: none selected");
    } else {
        let _ = writeln!(out, "  image: {}", image_summary(&draft.image_data));
    }
    out
}
