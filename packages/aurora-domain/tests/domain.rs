use aurora_domain::{Fingerprint, KeywordExtractor, Record, fingerprint, record};

fn sample_record() -> Record {
	Record {
		id: "b1e9bb83".to_string(),
		author_id: "cd3a350e".to_string(),
		author_name: "Sophia Al-Farsi".to_string(),
		timestamp: "2025-05-05T07:47:20.159073+00:00".to_string(),
		text: "Please book a private jet to Paris for this Friday.".to_string(),
	}
}

#[test]
fn formats_labeled_fields_in_fixed_order() {
	let text = sample_record().formatted_text();

	assert_eq!(
		text,
		"From: Sophia Al-Farsi | User ID: cd3a350e | Message: Please book a private jet to Paris \
		 for this Friday. | Time: 2025-05-05T07:47:20.159073+00:00"
	);
}

#[test]
fn omits_empty_fields() {
	let mut record = sample_record();

	record.author_name.clear();
	record.timestamp.clear();

	assert_eq!(
		record.formatted_text(),
		"User ID: cd3a350e | Message: Please book a private jet to Paris for this Friday."
	);
	assert!(record.prompt_text().starts_with("User ID: cd3a350e\nMessage: "));
}

#[test]
fn decodes_upstream_message_shape() {
	let json = serde_json::json!({
		"id": "609ba052",
		"user_id": "e35ed60a",
		"user_name": "Fatima El-Tahir",
		"timestamp": "2024-11-14T20:03:44.159235+00:00",
		"message": "Can you confirm my dinner reservation?"
	});
	let record: Record = serde_json::from_value(json).expect("Failed to decode record.");

	assert_eq!(record.author_name, "Fatima El-Tahir");
	assert_eq!(record.text, "Can you confirm my dinner reservation?");
}

#[test]
fn missing_upstream_fields_decode_as_empty() {
	let json = serde_json::json!({ "id": "m1", "message": "Window seat please." });
	let record: Record = serde_json::from_value(json).expect("Failed to decode record.");

	assert!(record.author_name.is_empty());
	assert_eq!(record.formatted_text(), "Message: Window seat please.");
}

#[test]
fn identical_text_yields_identical_fingerprint() {
	let a = sample_record().formatted_text();
	let b = sample_record().formatted_text();

	assert_eq!(Fingerprint::of(&a), Fingerprint::of(&b));
	assert_eq!(Fingerprint::of(&a).as_str().len(), 32);
	assert_ne!(Fingerprint::of(&a), Fingerprint::of("something else"));
}

#[test]
fn fingerprints_preserve_input_order() {
	let records = vec![sample_record(), {
		let mut other = sample_record();

		other.text = "Two opera tickets in Milan.".to_string();

		other
	}];
	let texts = record::format_all(&records);
	let prints = fingerprint::fingerprint_all(&texts);

	assert_eq!(prints.len(), 2);
	assert_eq!(prints[0], Fingerprint::of(&texts[0]));
	assert_eq!(prints[1], Fingerprint::of(&texts[1]));
}

#[test]
fn empty_text_has_no_keywords() {
	let extractor = KeywordExtractor::default();

	assert!(extractor.extract("").is_empty());
	assert!(extractor.extract("the and of").is_empty());
}

#[test]
fn custom_stop_words_replace_defaults() {
	let extractor = KeywordExtractor::with_stop_words(false, ["paris"]);
	let keywords = extractor.extract("Who is going to Paris?");

	assert!(!keywords.contains("paris"));
	assert!(keywords.contains("who"));
	assert!(keywords.contains("going"));
}
