/// Extensions that mark a reference as a downloadable media asset
///
/// Matching is containment of `.{ext}` in the canonical file name, not a
/// strict suffix test, so `data.csv.bak` still counts as `csv`.
pub const MEDIA_EXTENSIONS: &[&str] = &[
    // Audio
    "aif", "cda", "mid", "midi", "mp3", "mpa", "ogg", "wav", "wma", "wpl", "aac",
    // Compressed
    "7z", "arj", "deb", "pkg", "rar", "rpm", "tar.gz", "z", "zip",
    // Disk and media images
    "bin", "dmg", "iso", "toast", "vcd",
    // Data and database
    "csv", "dat", "db", "dbf", "log", "mdb", "sav", "sql", "tar", "xml",
    // Email
    "email", "eml", "emlx", "msg", "oft", "ost", "pst", "vcf",
    // Executable
    "apk", "bat", "exe", "gadget", "jar", "msi", "wsf",
    // Font
    "fnt", "fon", "otf", "ttf",
    // Image
    "ai", "bmp", "gif", "ico", "jpeg", "jpg", "png", "ps", "psd", "svg", "tif", "tiff",
    // Presentation
    "key", "odp", "pps", "ppt", "pptx",
    // Video and other
    "mpg", "mpeg", "avi", "wmv", "mov", "rm", "ram", "swf", "flv", "webm", "mp4",
];
