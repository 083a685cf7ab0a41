//! HTML rendering for the diagnosis page.
//!
//! Everything here is a pure function of its arguments: the same record and
//! language always produce the same bytes.

use crate::catalog::{DiseaseRecord, Language};

const SIDEBAR_ICON_URL: &str = "https://cdn-icons-png.flaticon.com/512/2909/2909767.png";

const STYLE: &str = r#"<style>
body {
    background: linear-gradient(120deg, #e8f5e9, #c8e6c9);
    font-family: "Segoe UI", sans-serif;
    margin: 0;
}
.layout { display: flex; min-height: 100vh; }
.sidebar {
    width: 280px;
    padding: 20px;
    background: linear-gradient(180deg, #a5d6a7, #81c784);
}
.main { flex: 1; padding: 20px 40px; }
.card {
    background-color: #ffffff;
    border-radius: 15px;
    padding: 20px;
    margin: 10px 0;
    box-shadow: 0px 4px 10px rgba(0,0,0,0.15);
}
.success { background-color: #e8f5e9; border-left: 6px solid #2e7d32; padding: 12px; border-radius: 8px; }
.notice { background-color: #fff3e0; border-left: 6px solid #ef6c00; padding: 12px; border-radius: 8px; }
.preview img { max-width: 100%; border-radius: 10px; }
.risk-low {color: green; font-weight: bold;}
.risk-medium {color: orange; font-weight: bold;}
.risk-high {color: red; font-weight: bold;}
h1, h2, h3, h4 { color: #2e7d32; }
</style>"#;

/// Problems reported back to the user above the upload form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    UnsupportedFile,
    UndecodableImage,
    ModelFailure,
    BadUpload,
}

impl Notice {
    pub fn text(self, lang: Language) -> &'static str {
        match (self, lang) {
            (Notice::UnsupportedFile, Language::English) => {
                "Unsupported file type. Please upload a JPG or PNG image."
            }
            (Notice::UnsupportedFile, Language::Hindi) => {
                "असमर्थित फ़ाइल प्रकार। कृपया JPG या PNG छवि अपलोड करें।"
            }
            (Notice::UndecodableImage, Language::English) => {
                "The uploaded file could not be read as an image."
            }
            (Notice::UndecodableImage, Language::Hindi) => {
                "अपलोड की गई फ़ाइल को छवि के रूप में पढ़ा नहीं जा सका।"
            }
            (Notice::ModelFailure, Language::English) => {
                "The model could not analyse this image. Please try again later."
            }
            (Notice::ModelFailure, Language::Hindi) => {
                "मॉडल इस छवि का विश्लेषण नहीं कर सका। कृपया बाद में पुनः प्रयास करें।"
            }
            (Notice::BadUpload, Language::English) => "The upload could not be read.",
            (Notice::BadUpload, Language::Hindi) => "अपलोड पढ़ा नहीं जा सका।",
        }
    }
}

/// Everything that varies between page loads.
#[derive(Debug, Clone, Default)]
pub struct PageView<'a> {
    pub language: Language,
    pub notice: Option<Notice>,
    pub preview: Option<Preview<'a>>,
    pub report: Option<&'a DiseaseRecord>,
}

/// The uploaded image, echoed back inline.
#[derive(Debug, Clone)]
pub struct Preview<'a> {
    pub mime: &'a str,
    pub base64: &'a str,
}

struct Labels {
    upload: &'static str,
    submit: &'static str,
    uploaded_caption: &'static str,
    report_heading: &'static str,
    detected: &'static str,
    about: &'static str,
    symptoms: &'static str,
    treatment: &'static str,
    prevention: &'static str,
    season: &'static str,
}

fn labels(lang: Language) -> &'static Labels {
    static EN: Labels = Labels {
        upload: "📷 Upload a Leaf Image",
        submit: "Diagnose",
        uploaded_caption: "🌿 Uploaded Leaf",
        report_heading: "🧬 Diagnosis Report",
        detected: "🩺 Disease Detected:",
        about: "About:",
        symptoms: "Symptoms:",
        treatment: "Treatment:",
        prevention: "Prevention Tips:",
        season: "🌤 Seasonal Risk:",
    };
    static HI: Labels = Labels {
        upload: "📷 पत्ती की छवि अपलोड करें",
        submit: "जांचें",
        uploaded_caption: "🌿 अपलोड की गई पत्ती",
        report_heading: "🧬 निदान रिपोर्ट",
        detected: "🩺 पहचाना गया रोग:",
        about: "विवरण:",
        symptoms: "लक्षण:",
        treatment: "उपचार:",
        prevention: "रोकथाम के उपाय:",
        season: "🌤 मौसमी जोखिम:",
    };
    match lang {
        Language::English => &EN,
        Language::Hindi => &HI,
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn list_card(out: &mut String, title: &str, items: &[&str]) {
    out.push_str(&format!("<div class='card'><b>{}</b><ul>", escape_html(title)));
    for item in items {
        out.push_str(&format!("<li>{}</li>", escape_html(item)));
    }
    out.push_str("</ul></div>\n");
}

/// Renders the diagnosis block for one catalog record.
pub fn render_report(record: &DiseaseRecord, lang: Language) -> String {
    let labels = labels(lang);
    let mut out = String::new();

    out.push_str(&format!(
        "<div class='success'>{} {}</div>\n",
        escape_html(labels.detected),
        escape_html(record.name)
    ));
    out.push_str(&format!(
        "<div class='card'><b>{}</b> {}</div>\n",
        escape_html(labels.about),
        escape_html(record.about)
    ));
    list_card(&mut out, labels.symptoms, record.symptoms);
    list_card(&mut out, labels.treatment, record.treatment);
    list_card(&mut out, labels.prevention, record.prevention);
    out.push_str(&format!(
        "<div class='card'><b>{}</b> {} (<span class='{}'>{}</span>)</div>\n",
        escape_html(labels.season),
        escape_html(record.season),
        record.risk.style().css_class(),
        escape_html(record.risk.label(lang))
    ));

    out
}

fn render_sidebar(out: &mut String, lang: Language) {
    out.push_str("<aside class='sidebar'>\n");
    out.push_str(&format!("<img src='{SIDEBAR_ICON_URL}' width='100' alt=''>\n"));
    out.push_str("<h2>🌾 About</h2>\n");
    out.push_str(
        "<div class='card'><b>Green Thinkers</b> is an AI-based agricultural assistant that helps farmers identify \
         plant diseases and provides treatment, prevention, and seasonal awareness in <b>English and Hindi</b>.</div>\n",
    );
    out.push_str("<p>Select Language / भाषा चुनें:</p>\n<ul class='languages'>\n");
    for option in Language::ALL {
        let marker = if option == lang { "◉" } else { "○" };
        out.push_str(&format!(
            "<li><a href='/?lang={}'>{} {}</a></li>\n",
            option.code(),
            marker,
            option.label()
        ));
    }
    out.push_str("</ul>\n</aside>\n");
}

fn render_upload_form(out: &mut String, lang: Language) {
    let labels = labels(lang);
    out.push_str("<form class='card' method='post' action='/diagnose' enctype='multipart/form-data'>\n");
    out.push_str(&format!("<input type='hidden' name='lang' value='{}'>\n", lang.code()));
    out.push_str(&format!("<label for='file'>{}</label>\n", escape_html(labels.upload)));
    out.push_str("<input type='file' id='file' name='file' accept='.jpg,.jpeg,.png'>\n");
    out.push_str(&format!("<button type='submit'>{}</button>\n", escape_html(labels.submit)));
    out.push_str("</form>\n");
}

/// Renders the full page around an optional report.
pub fn render_page(view: &PageView<'_>) -> String {
    let lang = view.language;
    let labels = labels(lang);
    let mut out = String::new();

    out.push_str(&format!(
        "<!DOCTYPE html>\n<html lang='{}'>\n<head>\n<meta charset='utf-8'>\n<title>Green Thinkers 🌱</title>\n",
        lang.code()
    ));
    out.push_str(STYLE);
    out.push_str("\n</head>\n<body>\n<div class='layout'>\n");

    render_sidebar(&mut out, lang);

    out.push_str("<main class='main'>\n");
    out.push_str("<h1 style='text-align:center;'>🌿 Green Thinkers</h1>\n");
    out.push_str(
        "<h4 style='text-align:center;color:#388e3c;'>AI-Based Plant Disease Detection | एआई आधारित पौध रोग पहचान</h4>\n<hr>\n",
    );

    render_upload_form(&mut out, lang);

    if let Some(notice) = view.notice {
        out.push_str(&format!("<div class='notice'>{}</div>\n", escape_html(notice.text(lang))));
    }

    if let Some(preview) = &view.preview {
        out.push_str(&format!(
            "<figure class='preview'><img src='data:{};base64,{}' alt=''><figcaption>{}</figcaption></figure>\n",
            preview.mime,
            preview.base64,
            escape_html(labels.uploaded_caption)
        ));
    }

    if let Some(record) = view.report {
        out.push_str(&format!("<hr>\n<h3>{}</h3>\n", escape_html(labels.report_heading)));
        out.push_str(&render_report(record, lang));
    }

    out.push_str("<hr>\n<p style='text-align:center;color:#1b5e20;'>🌿 Developed by Green Thinkers | Empowering Smart Agriculture 🌾</p>\n");
    out.push_str("</main>\n</div>\n</body>\n</html>\n");
    out
}
