use foliobase::chat::{extract, ExtractedPayload, PayloadKind};

fn scalar(payload: Option<ExtractedPayload>) -> String {
    match payload {
        Some(ExtractedPayload::Scalar(text)) => text,
        other => panic!("expected a scalar payload, got {other:?}"),
    }
}

fn item(payload: Option<ExtractedPayload>) -> (String, String) {
    match payload {
        Some(ExtractedPayload::Item { title, description }) => (title, description),
        other => panic!("expected an item payload, got {other:?}"),
    }
}

#[test]
fn fenced_json_block_yields_an_item() {
    let raw = "Here is the project you asked for:\n```json\n{\n  \"title\": \"Brand Refresh\",\n  \"description\": \"Complete visual identity overhaul\"\n}\n```\nLet me know if you want changes.";
    let (title, description) = item(extract(raw, PayloadKind::Item));
    assert_eq!(title, "Brand Refresh");
    assert_eq!(description, "Complete visual identity overhaul");
}

#[test]
fn loose_json_is_found_without_a_fence() {
    let raw = "Sure thing! {\"title\": \"CLI Tool\", \"description\": \"Tiny but fast\"} enjoy.";
    let (title, description) = item(extract(raw, PayloadKind::Item));
    assert_eq!(title, "CLI Tool");
    assert_eq!(description, "Tiny but fast");
}

#[test]
fn key_fragments_assemble_an_item_as_a_last_resort() {
    let raw = "Title: \"Launch Page\"\nDescription: A landing page for the product launch";
    let (title, description) = item(extract(raw, PayloadKind::Item));
    assert_eq!(title, "Launch Page");
    assert_eq!(description, "A landing page for the product launch");
}

#[test]
fn item_extraction_requires_a_title_somewhere() {
    assert_eq!(
        extract("no structured content in this reply at all", PayloadKind::Item),
        None
    );
}

#[test]
fn bio_loses_its_boilerplate_preamble() {
    let raw = "Here's a new bio: I build accessible web apps and write about design systems.";
    assert_eq!(
        scalar(extract(raw, PayloadKind::Bio)),
        "I build accessible web apps and write about design systems."
    );
}

#[test]
fn bio_prefers_the_first_substantial_paragraph() {
    let raw = "Short intro.\n\nThis second paragraph is much longer and describes the actual work I do for clients every day.";
    let text = scalar(extract(raw, PayloadKind::Bio));
    assert!(text.starts_with("This second paragraph"));
    assert!(!text.contains("Short intro"));
}

#[test]
fn bio_drops_markdown_markers() {
    let raw = "**Passionate** engineer # building small tools";
    let text = scalar(extract(raw, PayloadKind::Bio));
    assert!(!text.contains('*'));
    assert!(!text.contains('#'));
}

#[test]
fn headline_keeps_only_its_first_line() {
    let raw = "Updated headline:\nDesign leadership for small teams\nHope you like it!";
    assert_eq!(
        scalar(extract(raw, PayloadKind::Headline)),
        "Design leadership for small teams"
    );
}

#[test]
fn headline_is_capped_at_one_hundred_characters() {
    let raw = "x".repeat(140);
    let text = scalar(extract(&raw, PayloadKind::Headline));
    assert_eq!(text.chars().count(), 100);
}

#[test]
fn scalar_sheds_one_wrapping_quote_layer() {
    assert_eq!(
        scalar(extract("\"Design leader and mentor\"", PayloadKind::Title)),
        "Design leader and mentor"
    );
}

#[test]
fn prefix_stripping_needs_a_recognized_opener() {
    assert_eq!(
        scalar(extract("My updated take: stays whole", PayloadKind::Headline)),
        "My updated take: stays whole"
    );
}

#[test]
fn blank_replies_extract_to_nothing() {
    assert_eq!(extract("   \n  ", PayloadKind::Bio), None);
    assert_eq!(extract("", PayloadKind::Item), None);
}
