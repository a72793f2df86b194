#![allow(missing_docs)]

use relay_links::embellish;

#[test]
fn embellish_plain_deal_text() {
    assert_eq!(
        embellish("best price on this item"),
        "🔥 ⭐ best 💰 price on this item\n\n🛒 \n**Shop Now & Save!**\n⚡ \n**Limited Time Offer!**"
    );
}

#[test]
fn embellish_breaks_before_bold_span_after_lead_marker() {
    assert_eq!(
        embellish("🔥 **Mega Sale** today, order now"),
        "🔥 \n**Mega 🔥 Sale** today, order now\n⚡ \n**Limited Time Offer!**"
    );
}

#[test]
fn embellish_keeps_existing_lead_emoji() {
    let output = embellish("🎉 Sale on headphones, buy now");
    assert!(output.starts_with("🎉 🔥 Sale"));
    assert!(!output.contains("Shop Now"));
}

#[test]
fn embellish_does_not_repeat_urgency() {
    let output = embellish("Hurry, big discount, order now");
    assert!(!output.contains("Limited Time Offer"));
}

#[test]
fn embellish_adds_trust_footer_for_amazon() {
    let output = embellish("Found on amazon, grab it");
    assert!(output.ends_with("\n✅ \n**Amazon Verified Product**"));
}

#[test]
fn embellish_keyword_match_is_whole_word_and_case_insensitive() {
    let output = embellish("GAMING mouse, order now");
    assert!(output.contains("🎮 GAMING"));
    let output = embellish("Great offerings, order now");
    assert!(output.contains("⭐ Great offerings"));
    assert!(!output.contains("🔥 offerings"));
}

#[test]
fn embellish_blank_input_is_unchanged() {
    assert_eq!(embellish(""), "");
    assert_eq!(embellish("   "), "   ");
}

#[test]
fn embellish_does_not_decorate_inside_urls() {
    let output = embellish("buy now https://www.amazon.in/dp/B08N5WRWNW?tag=best-deal-21");
    assert!(output.contains("https://www.amazon.in/dp/B08N5WRWNW?tag=best-deal-21"));
}

#[test]
fn embellish_output_is_right_trimmed() {
    let output = embellish("order now   \n\n");
    assert_eq!(output, "🔥 order now");
}
