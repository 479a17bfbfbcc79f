use crate::data::ContactProfile;

const REGION: &str = "Georgia";

/// Bridge-loan introduction email for one ranked contact
pub fn outreach_template(contact: &ContactProfile) -> String {
    let counties = contact
        .flip_counties
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let area = match contact.flip_counties.len() {
        0 => "your area".to_string(),
        1 => format!("{} County", counties),
        _ => format!("{} Counties", counties),
    };
    let flips = if contact.total_flips == 1 {
        "1 completed flip".to_string()
    } else {
        format!("{} completed flips", contact.total_flips)
    };

    format!(
        "Subject: Quick Bridge Loan Opportunity for {region} Flippers

Hi {name},

I noticed your recent successful property flips in {area}.
With {flips}, you're clearly an active investor.

We specialize in fast bridge loans (7-30 day closings) for {region} house flippers:
• Rates starting at 9.99%
• Up to 75% LTV
• Close in as little as 7 days
• No income verification needed

Would you be open to a 15-minute chat next week to discuss your upcoming projects?

Best regards,
[Your Name]
[Your Company]
[Phone Number]",
        region = REGION,
        name = contact.investor_name,
        area = area,
        flips = flips,
    )
}
