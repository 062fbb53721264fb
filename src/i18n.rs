//! Key based lookup of localized display strings. Keys are the English
//! phrases; unknown keys echo back unchanged so a missing entry never hides
//! a message.

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Lang {
    En,
    #[default]
    Id,
}

#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    lang: Lang,
}

impl Catalog {
    pub fn new(lang: Lang) -> Self {
        Catalog { lang }
    }

    pub fn tr(&self, key: &str) -> String {
        lookup(self.lang, key).unwrap_or(key).to_string()
    }

    /// Like [`tr`](Self::tr), with `{name}` placeholders replaced by the
    /// given arguments.
    pub fn tr_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.tr(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

fn lookup(lang: Lang, key: &str) -> Option<&'static str> {
    match lang {
        Lang::En => match key {
            "Ready" => Some("Ready"),
            "Loaded file" => Some("Loaded {rows} rows from {name}"),
            "File processing failed" => Some("Failed to process file: {message}"),
            "Only CSV supported" => Some("Only CSV files are supported for now"),
            "File not found" => Some("File not found"),
            "Permission denied" => Some("Permission denied"),
            "Malformed CSV" => Some("the CSV needs at least one header and one data row"),
            "Filter applied" => Some("Filter: {column} contains \"{text}\""),
            "Filter removed" => Some("Filter on {column} removed"),
            "Filters cleared" => Some("All filters cleared"),
            "Sorted by" => Some("Sorted by {column} ({direction})"),
            "Dataset cleared" => Some("Dataset cleared"),
            "Switched dataset" => Some("Dataset: {name}"),
            "Copied cell" => Some("Copied cell to clipboard"),
            "Copied row" => Some("Copied row to clipboard"),
            "Clipboard unavailable" => Some("Clipboard is not available"),
            "No data to analyze" => Some("No data to analyze. Open a file first."),
            "Analysis done" => Some("Analysis finished"),
            "Missing api key" => Some("API key is not configured (set MEJA_API_KEY)"),
            "Analysis failed" => Some("The analysis service returned an error: {message}"),
            "Row inserted" => Some("Row added"),
            "Row updated" => Some("Row updated"),
            "Row deleted" => Some("Row deleted"),
            "Filter prompt" => Some("filter {column}"),
            "Analyze prompt" => Some("ask"),
            "Insert prompt" => Some("add row (comma separated)"),
            "Edit prompt" => Some("edit row"),
            _ => None,
        },
        Lang::Id => match key {
            "Ready" => Some("Siap"),
            "Loaded file" => Some("Memuat {rows} baris dari {name}"),
            "File processing failed" => Some("Gagal memproses file: {message}"),
            "Only CSV supported" => Some("Saat ini hanya file CSV yang didukung"),
            "File not found" => Some("File tidak ditemukan"),
            "Permission denied" => Some("Izin akses ditolak"),
            "Malformed CSV" => Some("CSV harus memiliki setidaknya satu header dan satu baris data"),
            "Filter applied" => Some("Filter: {column} memuat \"{text}\""),
            "Filter removed" => Some("Filter pada {column} dihapus"),
            "Filters cleared" => Some("Semua filter dihapus"),
            "Sorted by" => Some("Diurutkan berdasarkan {column} ({direction})"),
            "Dataset cleared" => Some("Data dihapus"),
            "Switched dataset" => Some("Dataset: {name}"),
            "Copied cell" => Some("Sel disalin ke clipboard"),
            "Copied row" => Some("Baris disalin ke clipboard"),
            "Clipboard unavailable" => Some("Clipboard tidak tersedia"),
            "No data to analyze" => Some("Tidak ada data untuk dianalisis. Buka file terlebih dahulu."),
            "Analysis done" => Some("Analisis selesai"),
            "Missing api key" => Some("Kunci API belum diatur (setel MEJA_API_KEY)"),
            "Analysis failed" => Some("Terjadi kesalahan saat menghubungi AI: {message}"),
            "Row inserted" => Some("Baris ditambahkan"),
            "Row updated" => Some("Baris diperbarui"),
            "Row deleted" => Some("Baris dihapus"),
            "Filter prompt" => Some("filter {column}"),
            "Analyze prompt" => Some("tanya"),
            "Insert prompt" => Some("tambah baris (dipisah koma)"),
            "Edit prompt" => Some("ubah baris"),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_per_language() {
        assert_eq!(Catalog::new(Lang::En).tr("Ready"), "Ready");
        assert_eq!(Catalog::new(Lang::Id).tr("Ready"), "Siap");
    }

    #[test]
    fn unknown_keys_echo_back() {
        assert_eq!(Catalog::new(Lang::En).tr("Does not exist"), "Does not exist");
    }

    #[test]
    fn substitutes_named_parameters() {
        let text = Catalog::new(Lang::En).tr_args(
            "Loaded file",
            &[("rows", "42"), ("name", "sales.csv")],
        );
        assert_eq!(text, "Loaded 42 rows from sales.csv");
    }
}
