//! Seed collections shown before any file is opened. Static, in-memory only.

use crate::data::{Dataset, Row, Value};

fn s(v: &str) -> Value {
    Value::Str(v.to_string())
}

fn n(v: f64) -> Value {
    Value::Num(v)
}

fn row(pairs: Vec<(&str, Value)>) -> Row {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|h| h.to_string()).collect()
}

pub fn initial_datasets() -> Vec<Dataset> {
    vec![
        transactions(),
        sales(),
        inventory(),
        customers(),
        integrations(),
        users(),
    ]
}

fn transactions() -> Dataset {
    let h = headers(&["Date", "Item", "Quantity", "Price", "Customer"]);
    let rows = vec![
        row(vec![
            ("Date", s("2026-08-15")),
            ("Item", s("Minyak Goreng Sania 2L")),
            ("Quantity", n(20.0)),
            ("Price", n(35000.0)),
            ("Customer", s("Toko Laris")),
        ]),
        row(vec![
            ("Date", s("2026-08-10")),
            ("Item", s("Indomie Goreng Satuan")),
            ("Quantity", n(120.0)),
            ("Price", n(3000.0)),
            ("Customer", s("Kantin Sekolah Ceria")),
        ]),
        row(vec![
            ("Date", s("2026-07-25")),
            ("Item", s("Beras Rojolele 5kg")),
            ("Quantity", n(30.0)),
            ("Price", n(65000.0)),
            ("Customer", s("CV Berkah")),
        ]),
    ];
    Dataset::new("transactions", h, rows)
}

fn sales() -> Dataset {
    let h = headers(&["Invoice ID", "Customer", "Date", "Total", "Status"]);
    let entries: [(&str, &str, &str, f64, &str); 10] = [
        ("INV-202608001", "Toko Jaya", "2026-08-02", 1250000.0, "Lunas"),
        ("INV-202608002", "Bu Siti", "2026-08-05", 350000.0, "Lunas"),
        ("INV-202608003", "Kantin Sekolah Ceria", "2026-08-10", 780000.0, "Belum Lunas"),
        ("INV-202608004", "Toko Laris", "2026-08-15", 2100000.0, "Lunas"),
        ("INV-202607005", "Resto Padang Nikmat", "2026-07-08", 4500000.0, "Lunas"),
        ("INV-202607006", "Pak Budi", "2026-07-18", 150000.0, "Lunas"),
        ("INV-202607007", "CV Berkah", "2026-07-25", 3200000.0, "Lunas"),
        ("INV-202606008", "Warung Amanah", "2026-06-12", 950000.0, "Lunas"),
        ("INV-202606009", "Toko Jaya", "2026-06-20", 1800000.0, "Lunas"),
        ("INV-202606010", "Adi Santoso", "2026-06-28", 80000.0, "Belum Lunas"),
    ];
    let rows = entries
        .into_iter()
        .map(|(id, customer, date, total, status)| {
            row(vec![
                ("Invoice ID", s(id)),
                ("Customer", s(customer)),
                ("Date", s(date)),
                ("Total", n(total)),
                ("Status", s(status)),
            ])
        })
        .collect();
    Dataset::new("sales", h, rows)
}

fn inventory() -> Dataset {
    let h = headers(&["Item Name", "SKU", "Stock", "Location", "Price"]);
    let entries: [(&str, &str, f64, &str, f64); 10] = [
        ("Beras Rojolele 5kg", "BRS-RJ-5K", 50.0, "Rak A-1", 65000.0),
        ("Gula Pasir 1kg", "GLA-PS-1K", 120.0, "Rak A-2", 15000.0),
        ("Minyak Goreng Sania 2L", "MYK-SN-2L", 80.0, "Rak A-3", 35000.0),
        ("Kopi Kapal Api Special 165g", "KPI-KA-165", 200.0, "Rak C-1", 13000.0),
        ("Sabun Lifebuoy Total 10", "SBN-LB-T10", 250.0, "Rak B-1", 4500.0),
        ("Teh Celup Sariwangi", "TEH-SW-BOX", 150.0, "Rak C-2", 6000.0),
        ("Indomie Goreng Satuan", "MIE-IG-PCS", 300.0, "Rak C-3", 3000.0),
        ("Air Mineral Aqua 600ml", "AIR-AQ-600", 280.0, "Rak D-1", 3500.0),
        ("Kecap Manis ABC 520ml", "KCP-AC-520", 90.0, "Rak A-4", 20000.0),
        ("Gudang Garam Surya 12", "RKK-GG-S12", 100.0, "Kasir", 25000.0),
    ];
    let rows = entries
        .into_iter()
        .map(|(name, sku, stock, location, price)| {
            row(vec![
                ("Item Name", s(name)),
                ("SKU", s(sku)),
                ("Stock", n(stock)),
                ("Location", s(location)),
                ("Price", n(price)),
            ])
        })
        .collect();
    Dataset::new("inventory", h, rows)
}

fn customers() -> Dataset {
    let h = headers(&["Name", "Email", "Contact", "Address", "History"]);
    let entries: [(&str, &str, &str, &str, &str); 10] = [
        ("Pak Budi", "pak.budi@example.com", "081234567890", "Jl. Merdeka No. 1, Jakarta", "5 Transaksi"),
        ("Bu Siti", "bu.siti@example.com", "081876543210", "Jl. Pahlawan No. 2, Surabaya", "8 Transaksi"),
        ("Toko Jaya", "info@tokojaya.com", "021-555-1111", "Pasar Baru Blok B No. 3, Jakarta", "12 Transaksi"),
        ("Toko Laris", "laris@toko.com", "085611112222", "Jl. Kenanga No. 4, Bandung", "10 Transaksi"),
        ("Warung Amanah", "amanah.warung@example.com", "081333334444", "Jl. Gajah Mada No. 5, Semarang", "7 Transaksi"),
        ("Adi Santoso", "adi.santoso@example.com", "087855556666", "Jl. Melati No. 6, Yogyakarta", "3 Transaksi"),
        ("CV Berkah", "cv.berkah@example.com", "031-888-2222", "Komp. Ruko Sejahtera, Surabaya", "9 Transaksi"),
        ("Resto Padang Nikmat", "padang.nikmat@example.com", "022-444-3333", "Jl. Sudirman No. 7, Bandung", "11 Transaksi"),
        ("Eka Putri", "eka.putri@example.com", "081999990000", "Jl. Mawar No. 8, Denpasar", "2 Transaksi"),
        ("Kantin Sekolah Ceria", "kantin.ceria@example.com", "081212121212", "Jl. Pendidikan No. 9, Jakarta", "15 Transaksi"),
    ];
    let rows = entries
        .into_iter()
        .map(|(name, email, contact, address, history)| {
            row(vec![
                ("Name", s(name)),
                ("Email", s(email)),
                ("Contact", s(contact)),
                ("Address", s(address)),
                ("History", s(history)),
            ])
        })
        .collect();
    Dataset::new("customers", h, rows)
}

fn integrations() -> Dataset {
    let h = headers(&["Name", "Type", "Status", "Description"]);
    let rows = vec![
        row(vec![
            ("Name", s("Sistem Akuntansi ABC")),
            ("Type", s("Akuntansi")),
            ("Status", s("Terhubung")),
            ("Description", s("Sinkronisasi faktur dan pembayaran secara otomatis.")),
        ]),
        row(vec![
            ("Name", s("Payment Gateway XYZ")),
            ("Type", s("Payment Gateway")),
            ("Status", s("Terhubung")),
            ("Description", s("Terima pembayaran online melalui berbagai metode.")),
        ]),
        row(vec![
            ("Name", s("Layanan Logistik JNE")),
            ("Type", s("Logistik")),
            ("Status", s("Tidak Terhubung")),
            ("Description", s("Lacak pengiriman dan perbarui status pesanan.")),
        ]),
    ];
    Dataset::new("integrations", h, rows)
}

fn users() -> Dataset {
    let h = headers(&["Name", "Email", "Role"]);
    let rows = vec![
        row(vec![
            ("Name", s("Admin ERP")),
            ("Email", s("admin@mitrausahamakmur.com")),
            ("Role", s("Admin")),
        ]),
        row(vec![
            ("Name", s("Budi Hartono")),
            ("Email", s("budi.hartono@mitrausahamakmur.com")),
            ("Role", s("Manajer")),
        ]),
        row(vec![
            ("Name", s("Citra Dewi")),
            ("Email", s("citra.dewi@mitrausahamakmur.com")),
            ("Role", s("Staf")),
        ]),
    ];
    Dataset::new("users", h, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dataset_row_matches_its_headers() {
        for dataset in initial_datasets() {
            assert!(!dataset.headers.is_empty(), "{}", dataset.name);
            for row in &dataset.rows {
                for key in row.keys() {
                    assert!(
                        dataset.headers.contains(key),
                        "{}: stray column {}",
                        dataset.name,
                        key
                    );
                }
            }
        }
    }

    #[test]
    fn seeds_render_through_the_generic_engine() {
        let dataset = sales();
        let order = crate::engine::view_order(
            &dataset.headers,
            &dataset.rows,
            &crate::engine::FilterSet::new(),
            Some(&crate::engine::SortSpec::ascending("Total")),
        );
        assert_eq!(order.len(), dataset.rows.len());
        // Smallest invoice total first.
        assert_eq!(
            dataset.rows[order[0]].get("Invoice ID"),
            Some(&Value::Str("INV-202606010".into()))
        );
    }
}
