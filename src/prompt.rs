//! System prompt construction for the AI gateway.
//!
//! One fixed template per supported language, instructing the model to act
//! as an agricultural advisor for Kerala. Location and crop clauses are
//! embedded only when the farmer's profile provides them.

use crate::model::Language;

struct Template {
    intro: &'static str,
    location_label: &'static str,
    crops_label: &'static str,
    closing: &'static str,
}

const MALAYALAM: Template = Template {
    intro: "നിങ്ങൾ കേരള സർക്കാരിന്റെ കൃഷി വകുപ്പിന്റെ AI കൃഷി ഉപദേശകനാണ്. കേരളത്തിലെ കർഷകർക്ക് കൃഷിസംബന്ധമായ ശാസ്ത്രീയവും പ്രായോഗികവുമായ ഉപദേശങ്ങൾ നൽകുക.",
    location_label: "ഉപയോക്താവിന്റെ സ്ഥലം",
    crops_label: "കർഷകന്റെ പ്രധാന വിളകൾ",
    closing: "മലയാളത്തിൽ വിശദമായി മറുപടി നൽകുക.",
};

const HINDI: Template = Template {
    intro: "आप केरल सरकार के कृषि विभाग के AI कृषि सलाहकार हैं। केरल के किसानों को कृषि संबंधी वैज्ञानिक और व्यावहारिक सलाह दें।",
    location_label: "उपयोगकर्ता का स्थान",
    crops_label: "किसान की मुख्य फसलें",
    closing: "हिंदी में विस्तृत उत्तर दें।",
};

const TAMIL: Template = Template {
    intro: "நீங்கள் கேரள அரசின் விவசாயத் துறையின் AI விவசாய ஆலோசகர். கேரளாவின் விவசாயிகளுக்கு விவசாயம் தொடர்பான அறிவியல் மற்றும் நடைமுறை ஆலோசனைகளை வழங்குங்கள்.",
    location_label: "பயனாளரின் இடம்",
    crops_label: "விவசாயியின் முக்கிய பயிர்கள்",
    closing: "தமிழில் விரிவான பதில் கொடுங்கள்.",
};

const ENGLISH: Template = Template {
    intro: "You are an AI agricultural advisor for the Kerala Government Department of Agriculture. Provide scientific and practical farming advice to farmers in Kerala.",
    location_label: "User location",
    crops_label: "Farmer's main crops",
    closing: "Respond in English with detailed guidance.",
};

fn template(language: Language) -> &'static Template {
    match language {
        Language::Malayalam => &MALAYALAM,
        Language::Hindi => &HINDI,
        Language::Tamil => &TAMIL,
        Language::English => &ENGLISH,
    }
}

/// Build the advisor system prompt for `language`, embedding the farmer's
/// location and crop list when known.
pub fn system_prompt(language: Language, location: Option<&str>, crops: Option<&str>) -> String {
    let template = template(language);
    let mut prompt = String::from(template.intro);

    if let Some(location) = location {
        prompt.push(' ');
        prompt.push_str(template.location_label);
        prompt.push_str(": ");
        prompt.push_str(location);
        prompt.push('.');
    }

    if let Some(crops) = crops {
        prompt.push(' ');
        prompt.push_str(template.crops_label);
        prompt.push_str(": ");
        prompt.push_str(crops);
        prompt.push('.');
    }

    prompt.push(' ');
    prompt.push_str(template.closing);
    prompt
}
