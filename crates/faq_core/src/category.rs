use crate::config::MatcherConfig;
use crate::fuzzy::partial_ratio_exceeds;
use crate::model::Dataset;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub description: String,
    /// Lowercased, unique, in insertion order.
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategorySet {
    categories: Vec<Category>,
    /// (category, keyword) -> position of its representative entry; first writer wins.
    representatives: HashMap<(String, String), usize>,
}

impl CategorySet {
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn representative(&self, category: &str, keyword: &str) -> Option<usize> {
        self.representatives
            .get(&(category.to_string(), keyword.to_string()))
            .copied()
    }

    fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn category_mut(&mut self, name: &str) -> &mut Category {
        let pos = match self.categories.iter().position(|c| c.name == name) {
            Some(pos) => pos,
            None => {
                self.categories.push(Category {
                    name: name.to_string(),
                    description: String::new(),
                    keywords: Vec::new(),
                });
                self.categories.len() - 1
            }
        };
        &mut self.categories[pos]
    }

    fn add_keyword(&mut self, category: &str, keyword: String, entry: Option<usize>) {
        if keyword.is_empty() {
            return;
        }
        if let Some(entry) = entry {
            self.representatives
                .entry((category.to_string(), keyword.clone()))
                .or_insert(entry);
        }
        let cat = self.category_mut(category);
        if !cat.keywords.contains(&keyword) {
            cat.keywords.push(keyword);
        }
    }

    fn describe(&mut self, category: &str, description: &str) {
        let cat = self.category_mut(category);
        if cat.description.is_empty() {
            cat.description = description.to_string();
        }
    }

    /// Explicit `keywords` plus link labels, for entries that carry either.
    fn explicit(dataset: &Dataset) -> Self {
        let mut set = Self::default();
        for (pos, faq) in dataset.entries.iter().enumerate() {
            let link_texts = faq.links.iter().map(|l| l.text.as_str());
            let keywords: Vec<String> = faq
                .keywords
                .iter()
                .map(String::as_str)
                .chain(link_texts)
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            if keywords.is_empty() {
                continue;
            }
            let key = faq.category_key();
            set.describe(&key, &faq.answer);
            for kw in keywords {
                set.add_keyword(&key, kw, Some(pos));
            }
        }
        set
    }

    /// Question paraphrases grouped by category, acting as implicit keywords.
    fn implicit(dataset: &Dataset) -> Self {
        let mut set = Self::default();
        for (pos, faq) in dataset.entries.iter().enumerate() {
            let key = faq.category_key();
            set.describe(&key, &faq.answer);
            for q in &faq.questions {
                set.add_keyword(&key, q.trim().to_lowercase(), Some(pos));
            }
        }
        set.categories.retain(|c| !c.keywords.is_empty());
        set
    }

    /// `other` fills in after `self`: existing keywords, descriptions and
    /// representatives are never overwritten.
    fn merge(mut self, other: Self) -> Self {
        for cat in &other.categories {
            self.describe(&cat.name, &cat.description);
            for kw in &cat.keywords {
                let entry = other.representative(&cat.name, kw);
                self.add_keyword(&cat.name, kw.clone(), entry);
            }
        }
        for cat in &mut self.categories {
            if cat.description.is_empty() {
                cat.description = format!("Informasi tentang {}", cat.name);
            }
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryHit {
    pub category: String,
    pub description: String,
    pub matched_keyword: String,
    pub entry: Option<usize>,
}

/// Keyword shortcut table for one dataset generation.
#[derive(Debug, Clone)]
pub enum CategoryTable {
    /// Built from the active dataset's keywords and paraphrases.
    Derived(CategorySet),
    /// Generic public-information categories, used when the dataset yields none.
    StaticFallback(CategorySet),
}

impl CategoryTable {
    pub fn build(dataset: &Dataset) -> Self {
        let merged = CategorySet::explicit(dataset).merge(CategorySet::implicit(dataset));
        if merged.is_empty() {
            CategoryTable::StaticFallback(static_fallback())
        } else {
            CategoryTable::Derived(merged)
        }
    }

    pub fn set(&self) -> &CategorySet {
        match self {
            CategoryTable::Derived(set) | CategoryTable::StaticFallback(set) => set,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, CategoryTable::StaticFallback(_))
    }

    /// First keyword (category order, then keyword order) that matches `question`.
    pub fn find(&self, question: &str, config: &MatcherConfig) -> Option<CategoryHit> {
        let question = question.trim().to_lowercase();
        if question.is_empty() {
            return None;
        }
        let set = self.set();

        for cat in &set.categories {
            for kw in &cat.keywords {
                if kw.is_empty() {
                    continue;
                }
                let direct = question.contains(kw.as_str()) || kw.contains(question.as_str());
                let hit = direct || {
                    match partial_ratio_exceeds(&question, kw, config.threshold_for(kw)) {
                        Some(exceeds) => exceeds,
                        None => continue,
                    }
                };
                if hit {
                    debug!(category = %cat.name, keyword = %kw, direct, "category keyword matched");
                    return Some(CategoryHit {
                        category: cat.name.clone(),
                        description: cat.description.clone(),
                        matched_keyword: kw.clone(),
                        entry: set.representative(&cat.name, kw),
                    });
                }
            }
        }
        None
    }
}

const FALLBACK_CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "profil_badan_publik",
        "Informasi tentang profil badan publik",
        &[
            "kedudukan", "domisili", "alamat kantor", "visi misi", "tugas fungsi",
            "struktur organisasi", "profil pimpinan", "profil pegawai", "profil ppid",
            "struktur ppid", "lhkpn", "lhkan",
        ],
    ),
    (
        "program_kegiatan",
        "Ringkasan program dan kegiatan yang sedang dijalankan",
        &[
            "program kegiatan", "penanggungjawab program", "pelaksana program", "target capaian",
            "jadwal pelaksanaan", "sumber anggaran", "kak program", "agenda pelaksanaan",
            "e-samsat", "layanan online disdukcapil", "harga barang kebutuhan pokok",
            "penerimaan pegawai", "penerimaan peserta didik",
        ],
    ),
    (
        "kinerja",
        "Ringkasan informasi tentang kinerja",
        &[
            "laporan kinerja", "lkjip", "sakip", "sistem akuntabilitas kinerja", "ikplhd",
            "kinerja pengelolaan lingkungan", "lkpj", "laporan keterangan pertanggungjawaban",
        ],
    ),
    (
        "laporan_keuangan",
        "Ringkasan laporan keuangan",
        &[
            "kua", "kebijakan umum apbd", "ppas", "prioritas plafon anggaran", "apbd",
            "anggaran pendapatan belanja", "daftar aset", "calk", "catatan laporan keuangan",
            "neraca keuangan", "lra", "laporan realisasi anggaran", "laporan operasional",
            "laporan arus kas", "laporan perubahan ekuitas", "laporan perubahan saldo anggaran",
            "opini bpk", "rka", "rencana kerja anggaran", "dpa", "dokumen pelaksanaan anggaran",
            "rko", "rencana kerja operasional", "rfk", "realisasi fisik keuangan", "lkpd",
            "laporan keuangan pemerintah daerah",
        ],
    ),
    (
        "akses_informasi",
        "Laporan akses informasi publik",
        &[
            "laporan layanan informasi", "infografis laporan", "register permohonan",
            "rekapitulasi pelayanan", "indeks kepuasan masyarakat",
        ],
    ),
    (
        "peraturan_keputusan",
        "Informasi tentang peraturan, keputusan, dan/atau kebijakan",
        &[
            "daftar peraturan", "daftar keputusan", "pembentukan rancangan peraturan",
            "dokumen pendukung", "jdih dprd", "jaringan dokumentasi informasi hukum",
        ],
    ),
    (
        "tata_cara_informasi",
        "Informasi tentang hak dan tata cara memperoleh informasi publik",
        &[
            "hak memperoleh informasi", "tata cara memperoleh informasi",
            "tata cara pengajuan keberatan", "proses penyelesaian sengketa",
            "tata cara fasilitasi sengketa",
        ],
    ),
    (
        "pengaduan",
        "Informasi tentang tata cara pengaduan penyalahgunaan wewenang atau pelanggaran",
        &[
            "tata cara pengaduan", "penyalahgunaan wewenang", "pelanggaran",
            "penggunaan aplikasi lapor", "pengaduan pelayanan informasi", "formulir pengaduan",
            "standar pelayanan inspektorat", "hasil penanganan pengaduan",
        ],
    ),
    (
        "pengadaan_barang_jasa",
        "Pengumuman pengadaan barang dan jasa",
        &[
            "pengadaan barang", "pengadaan jasa", "tahap perencanaan", "sirup",
            "rencana umum pengadaan", "tahap pemilihan", "tahap pelaksanaan", "lpse",
            "layanan pengadaan elektronik", "proyek strategis",
        ],
    ),
    (
        "ketenagakerjaan",
        "Informasi tentang ketenagakerjaan",
        &["e-makaryo", "lowongan pekerjaan", "info lowongan", "penerimaan calon pegawai"],
    ),
    (
        "kependudukan",
        "Informasi tentang kependudukan",
        &["profil perkembangan kependudukan", "buku data kependudukan", "profil gender"],
    ),
    (
        "peringatan_dini_bencana",
        "Informasi prosedur peringatan dini bencana",
        &[
            "informasi kebencanaan", "peringatan dini", "prosedur evakuasi", "keadaan darurat",
            "peta rawan bencana",
        ],
    ),
    (
        "sop",
        "Standar Operasional Prosedur",
        &[
            "sop", "standar operasional prosedur", "penyusunan daftar informasi",
            "pelayanan permohonan informasi", "pelayanan informasi inklusi",
            "uji konsekuensi informasi", "penanganan keberatan", "fasilitasi sengketa",
            "maklumat pelayanan", "pengumuman informasi", "standar biaya perolehan",
            "pelayanan informasi terintegrasi",
        ],
    ),
];

fn static_fallback() -> CategorySet {
    CategorySet {
        categories: FALLBACK_CATEGORIES
            .iter()
            .map(|(name, description, keywords)| Category {
                name: name.to_string(),
                description: description.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect(),
        representatives: HashMap::new(),
    }
}
