//! Content-type lookup by file extension

/// Returned when the extension is missing or not in the table
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Guess a content type from a file name.
///
/// The extension is the text after the last `.`, compared case-insensitively.
/// A name without a dot has no extension.
pub fn mime_type_of(filename: &str) -> &'static str {
    match filename.rsplit_once('.') {
        Some((_, ext)) => lookup(&ext.to_lowercase()).unwrap_or(DEFAULT_MIME_TYPE),
        None => DEFAULT_MIME_TYPE,
    }
}

fn lookup(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        "txt" => "text/plain",
        "csv" => "text/csv",
        "htm" | "html" | "php" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "swf" => "application/x-shockwave-flash",
        "flv" => "video/x-flv",

        // images
        "png" => "image/png",
        "jpe" | "jpeg" | "jpg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "ico" => "image/vnd.microsoft.icon",
        "tiff" | "tif" => "image/tiff",
        "svg" | "svgz" => "image/svg+xml",

        // archives
        "zip" => "application/zip",
        "rar" => "application/x-rar-compressed",
        "exe" | "msi" => "application/x-msdownload",
        "cab" => "application/vnd.ms-cab-compressed",

        // audio/video
        "mpg" | "mp2" | "mp3" => "audio/mpeg",
        "mp4" => "audio/mp4",
        "qt" | "mov" => "video/quicktime",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "aac" => "audio/aac",

        // adobe
        "pdf" => "application/pdf",
        "psd" => "image/vnd.adobe.photoshop",
        "ai" | "eps" | "ps" => "application/postscript",

        // ms office
        "doc" | "dot" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "dotx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.template",
        "docm" => "application/vnd.ms-word.document.macroEnabled.12",
        "dotm" => "application/vnd.ms-word.template.macroEnabled.12",
        "xls" | "xlt" | "xla" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xltx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.template",
        "xlsm" => "application/vnd.ms-excel.sheet.macroEnabled.12",
        "xltm" => "application/vnd.ms-excel.template.macroEnabled.12",
        "xlam" => "application/vnd.ms-excel.addin.macroEnabled.12",
        "xlsb" => "application/vnd.ms-excel.sheet.binary.macroEnabled.12",
        "ppt" | "pot" | "pps" | "ppa" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "potx" => "application/vnd.openxmlformats-officedocument.presentationml.template",
        "ppsx" => "application/vnd.openxmlformats-officedocument.presentationml.slideshow",
        "ppam" => "application/vnd.ms-powerpoint.addin.macroEnabled.12",
        "pptm" => "application/vnd.ms-powerpoint.presentation.macroEnabled.12",
        "potm" => "application/vnd.ms-powerpoint.template.macroEnabled.12",
        "ppsm" => "application/vnd.ms-powerpoint.slideshow.macroEnabled.12",
        "mdb" => "application/vnd.ms-access",

        // open document
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "rtf" => "application/rtf",

        _ => return None,
    };
    Some(mime)
}
