//! The compiled-in UI string table: the zero-latency first tier of the
//! translation cache. Lookups are by UI string id and exact-match only.

use std::collections::BTreeMap;

use crate::domain::Language;

/// `(id, english, arabic)` rows.
const UI_STRINGS: &[(&str, &str, &str)] = &[
    ("title", "StoryLand Adventures", "مغامرات أرض القصص"),
    ("login", "🔑 Login", "🔑 تسجيل الدخول"),
    ("signup", "✨ Sign Up", "✨ إنشاء حساب"),
    ("logout", "🚪", "🚪"),
    ("nav-home", "Home", "الرئيسية"),
    ("nav-stories", "Stories", "القصص"),
    ("nav-progress", "Progress", "التقدم"),
    ("nav-profile", "Profile", "الملف الشخصي"),
    ("hero-title", "Welcome to StoryLand Adventures!", "مرحباً بك في مغامرات أرض القصص!"),
    ("hero-subtitle", "Discover magical stories, learn new words, and earn stars as you read! Perfect for children aged 4-10.", "اكتشف القصص السحرية، تعلم كلمات جديدة، واحصل على نجوم أثناء القراءة! مثالي للأطفال من عمر 4-10 سنوات."),
    ("watch-demo", "🎬 Watch Demo", "🎬 مشاهدة العرض"),
    ("get-stories", "📚 Start Reading", "📚 ابدأ القراءة"),
    ("rating-text", "Rated 5 Stars by Parents", "تقييم 5 نجوم من الآباء"),
    ("dashboard-welcome", "Welcome back!", "مرحباً بعودتك!"),
    ("dashboard-encouragement", "Keep reading to earn more stars!", "استمر في القراءة للحصول على المزيد من النجوم!"),
    ("dashboard-completed", "Completed:", "مكتمل:"),
    ("stories-title", "Story Library", "مكتبة القصص"),
    ("stories-subtitle", "Choose your next adventure! Each story teaches new words and earns you stars.", "اختر مغامرتك التالية! كل قصة تعلمك كلمات جديدة وتكسبك نجوم."),
    ("filter-english", "🇺🇸 English", "🇺🇸 الإنجليزية"),
    ("filter-arabic", "🇵🇸 العربية", "🇵🇸 العربية"),
    ("back-to-stories", "← Back to Stories", "← العودة إلى القصص"),
    ("story-title", "Story Title", "عنوان القصة"),
    ("story-content", "Story content will be loaded here...", "سيتم تحميل محتوى القصة هنا..."),
    ("vocabulary-title", "New Words to Learn", "كلمات جديدة للتعلم"),
    ("audio-controls", "Audio Controls", "أدوات التحكم الصوتية"),
    ("previous", "⏮️ Previous", "⏮️ السابق"),
    ("play-pause", "▶️ Play", "▶️ تشغيل"),
    ("next", "⏭️ Next", "⏭️ التالي"),
    ("auth-welcome", "Welcome to StoryLand!", "مرحباً بك في أرض القصص!"),
    ("login-tab", "🔑 Login", "🔑 تسجيل الدخول"),
    ("signup-tab", "✨ Sign Up", "✨ إنشاء حساب"),
    ("login-username", "Username", "اسم المستخدم"),
    ("login-pin", "4-Digit PIN", "رمز PIN من 4 أرقام"),
    ("login-submit", "🚀 Login & Start Adventure", "🚀 تسجيل الدخول وبدء المغامرة"),
    ("signup-name", "Child's Name", "اسم الطفل"),
    ("signup-age", "Age (4-10 years)", "العمر (4-10 سنوات)"),
    ("signup-pin", "4-Digit PIN", "رمز PIN من 4 أرقام"),
    ("signup-confirm", "Confirm PIN", "تأكيد الرمز"),
    ("signup-submit", "✨ Create & Start Adventure", "✨ إنشاء وبدء المغامرة"),
    ("select-age", "Select age", "اختر العمر"),
    ("age-4", "4 years old", "4 سنوات"),
    ("age-5", "5 years old", "5 سنوات"),
    ("age-6", "6 years old", "6 سنوات"),
    ("age-7", "7 years old", "7 سنوات"),
    ("age-8", "8 years old", "8 سنوات"),
    ("age-9", "9 years old", "9 سنوات"),
    ("age-10", "10 years old", "10 سنوات"),
    ("progress-title", "Your Progress", "تقدمك"),];

/// The text of UI string `id` in `language`, if `id` is a known UI string.
pub fn lookup(id: &str, language: Language) -> Option<&'static str> {
    UI_STRINGS
        .iter()
        .find(|(key, _, _)| *key == id)
        .map(|&(_, en, ar)| match language {
            Language::English => en,
            Language::Arabic => ar,
        })
}

/// The whole table for one language, keyed by UI string id.
pub fn table(language: Language) -> BTreeMap<&'static str, &'static str> {
    UI_STRINGS
        .iter()
        .filter_map(|&(key, _, _)| lookup(key, language).map(|text| (key, text)))
        .collect()
}
