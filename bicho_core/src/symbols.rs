use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

pub const SYMBOL_NAMES: [&str; 25] = [
    "avestruz",
    "aguia",
    "burro",
    "borboleta",
    "cachorro",
    "cabra",
    "carneiro",
    "camelo",
    "cobra",
    "coelho",
    "cavalo",
    "elefante",
    "galo",
    "gato",
    "jacare",
    "leao",
    "macaco",
    "porco",
    "pavao",
    "peru",
    "touro",
    "tigre",
    "urso",
    "veado",
    "vaca",
];

const ASSET_BASE: &str = "https://res.cloudinary.com/dptprh0xk/image/upload";

const ASSET_PATHS: [(&str, &str); 25] = [
    ("avestruz", "v1762547489/avestruz_pur9xf.jpg"),
    ("aguia", "v1762547488/aguia_rqrgow.jpg"),
    ("burro", "v1762547479/burro_nhqsuo.jpg"),
    ("borboleta", "v1762547475/borboleta_dvxbt5.jpg"),
    ("cachorro", "v1762547474/cachorro_sbxa0t.jpg"),
    ("cabra", "v1762547463/cabra_syobez.jpg"),
    ("carneiro", "v1762547462/carneiro_el5q8c.jpg"),
    ("camelo", "v1762547462/camelo_zvqiib.jpg"),
    ("cobra", "v1762547449/cobra_vsptji.jpg"),
    ("coelho", "v1762547449/coelho_w3svli.jpg"),
    ("galo", "v1762547449/galo_xblsct.jpg"),
    ("cavalo", "v1762547438/cavalo_nfpnhr.jpg"),
    ("elefante", "v1762547437/elefante_oogtdd.jpg"),
    ("gato", "v1762547436/gato_zci9oe.jpg"),
    ("jacare", "v1762547430/jacare_teict1.jpg"),
    ("leao", "v1762547430/leao_ri1qwk.jpg"),
    ("macaco", "v1762547430/macaco_bxswmk.jpg"),
    ("porco", "v1762547425/porco_vidqjm.jpg"),
    ("pavao", "v1762547425/pavao_ulyvcg.jpg"),
    ("peru", "v1762547419/peru_jktqmx.jpg"),
    ("tigre", "v1762547419/tigre_c89mmi.jpg"),
    ("touro", "v1762547419/touro_ydodxb.jpg"),
    ("urso", "v1762547419/urso_xgaypz.jpg"),
    ("veado", "v1762547418/viado_p08gzp.jpg"),
    ("vaca", "v1762547418/vaca_x2m2gl.jpg"),
];

/// Image URL for a symbol name, `None` for names outside the table.
pub fn asset_url(name: &str) -> Option<String> {
    ASSET_PATHS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, path)| format!("{ASSET_BASE}/{path}"))
}

/// Uniform pick from [`SYMBOL_NAMES`].
pub fn random_symbol<R: Rng>(rng: &mut R) -> &'static str {
    SYMBOL_NAMES[rng.random_range(0..SYMBOL_NAMES.len())]
}

/// A loaded symbol image. One per name for the lifetime of the cache.
#[derive(Debug, PartialEq, Eq)]
pub struct SymbolAsset {
    pub name: String,
    pub url: Option<String>, // unknown names resolve to nothing
}

/// Cheap handle to a cached [`SymbolAsset`]; what reel strips hold.
#[derive(Debug, Clone)]
pub struct SymbolView(Arc<SymbolAsset>);

impl SymbolView {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn url(&self) -> Option<&str> {
        self.0.url.as_deref()
    }

    pub fn shares_asset_with(&self, other: &SymbolView) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for SymbolView {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

#[derive(Debug, Default)]
pub struct SymbolCache {
    assets: HashMap<String, Arc<SymbolAsset>>,
    loads: usize,
}

impl SymbolCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// View over the asset for `name`, loading it on first request.
    pub fn view(&mut self, name: &str) -> SymbolView {
        if let Some(asset) = self.assets.get(name) {
            return SymbolView(Arc::clone(asset));
        }
        let asset = Arc::new(SymbolAsset {
            name: name.to_string(),
            url: asset_url(name),
        });
        if asset.url.is_none() {
            tracing::debug!(symbol = name, "no asset for symbol");
        }
        self.loads += 1;
        self.assets.insert(name.to_string(), Arc::clone(&asset));
        SymbolView(asset)
    }

    pub fn preload(&mut self) {
        for name in SYMBOL_NAMES {
            self.view(name);
        }
    }

    /// Number of distinct asset loads performed so far.
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn assets(&self) -> impl Iterator<Item = &SymbolAsset> {
        self.assets.values().map(|a| a.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn every_name_has_an_asset() {
        for name in SYMBOL_NAMES {
            let url = asset_url(name).unwrap();
            assert!(url.starts_with(ASSET_BASE));
        }
        assert_eq!(asset_url("dragao"), None);
    }

    #[test]
    fn second_request_reuses_the_asset() {
        let mut cache = SymbolCache::new();
        let a = cache.view("tigre");
        let b = cache.view("tigre");
        assert!(a.shares_asset_with(&b));
        assert_eq!(cache.loads(), 1);
    }

    #[test]
    fn preload_loads_each_name_once() {
        let mut cache = SymbolCache::new();
        cache.preload();
        cache.preload();
        assert_eq!(cache.loads(), SYMBOL_NAMES.len());
    }

    #[test]
    fn unknown_name_still_yields_a_view() {
        let mut cache = SymbolCache::new();
        let view = cache.view("dragao");
        assert_eq!(view.name(), "dragao");
        assert_eq!(view.url(), None);
    }

    #[test]
    fn random_symbol_stays_in_the_set() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            assert!(SYMBOL_NAMES.contains(&random_symbol(&mut rng)));
        }
    }
}
