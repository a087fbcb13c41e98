//! HTML fragments for the public pages. Every dynamic value goes through
//! [`esc`], which also quotes `"` and `'` so it is safe inside attributes.

use std::fmt::Write;

use imobi_content::FormKind;
use imobi_listing::filter::SortKey;
use imobi_listing::pagination::page_window;
use imobi_listing::title::listing_title;
use imobi_listing::{Action, Categories, City, Listing, Modality, SearchFilter};
use imobi_persistence::entity::{
    banner, broker, chamada, content_page, site_config, slide,
};

use super::format::{area, count_label, price_label};

const PAGINATION_WIDTH: u32 = 5;

pub fn esc(s: &str) -> String {
    htmlescape::encode_minimal(s)
}

/// Links from content records: site-relative or http(s) only
pub fn safe_url(url: &str) -> Option<&str> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    let allowed = (url.starts_with('/') && !url.starts_with("//"))
        || lower.starts_with("https://")
        || lower.starts_with("http://");
    allowed.then_some(url)
}

fn text_paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", esc(p).replace('\n', "<br>")))
        .collect()
}

/// Header and footer data shared by every page
#[derive(Clone, Debug, Default)]
pub struct Chrome {
    pub site_name: String,
    pub base_url: String,
    pub config: Option<site_config::Model>,
    pub pages: Vec<content_page::Model>,
}

impl Chrome {
    fn company(&self) -> &str {
        self.config
            .as_ref()
            .map(|c| c.nome_empresa.as_str())
            .unwrap_or(&self.site_name)
    }
}

/// Per-page `<head>` values
#[derive(Clone, Debug, Default)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    /// Site-relative path of the canonical URL
    pub path: String,
}

fn header(chrome: &Chrome) -> String {
    let mut nav = String::new();
    for (href, label) in [
        ("/busca?acao=comprar", "Comprar"),
        ("/busca?acao=alugar", "Alugar"),
        ("/corretores", "Corretores"),
    ] {
        let _ = write!(nav, r#"<a href="{}">{}</a>"#, esc(href), esc(label));
    }
    for page in &chrome.pages {
        let _ = write!(
            nav,
            r#"<a href="/pagina/{}">{}</a>"#,
            esc(&page.slug),
            esc(&page.titulo)
        );
    }

    format!(
        r#"<header class="site-header"><a class="brand" href="/">{}</a><nav>{}</nav></header>"#,
        esc(chrome.company()),
        nav
    )
}

fn footer(chrome: &Chrome) -> String {
    let mut out = String::from(r#"<footer class="site-footer">"#);
    let _ = write!(out, "<strong>{}</strong>", esc(chrome.company()));

    if let Some(config) = &chrome.config {
        if let Some(creci) = &config.creci {
            let _ = write!(out, "<span>CRECI {}</span>", esc(creci));
        }
        let address = [&config.endereco, &config.bairro, &config.cidade, &config.estado]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if !address.is_empty() {
            let _ = write!(out, "<address>{}</address>", esc(&address));
        }
        let _ = write!(
            out,
            r#"<a href="tel:{}">{}</a> <a href="mailto:{}">{}</a>"#,
            esc(&imobi_common::utils::digits_only(&config.telefone)),
            esc(&config.telefone),
            esc(&config.email),
            esc(&config.email)
        );
        if let Some(whatsapp) = &config.whatsapp {
            let _ = write!(
                out,
                r#" <a href="https://wa.me/55{}">WhatsApp</a>"#,
                esc(&imobi_common::utils::digits_only(whatsapp))
            );
        }
        for (label, link) in [
            ("Facebook", &config.facebook),
            ("Instagram", &config.instagram),
            ("YouTube", &config.youtube),
            ("LinkedIn", &config.linkedin),
        ] {
            if let Some(url) = link.as_deref().and_then(safe_url) {
                let _ = write!(out, r#" <a href="{}" rel="noopener">{}</a>"#, esc(url), label);
            }
        }
    }

    out.push_str("</footer>");
    out
}

/// Full HTML document
pub fn layout(chrome: &Chrome, meta: &PageMeta, body: &str) -> String {
    let title = if meta.title.is_empty() {
        chrome.company().to_string()
    } else {
        format!("{} | {}", meta.title, chrome.company())
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
<link rel="canonical" href="{canonical}">
</head>
<body>
{header}
<main>
{body}
</main>
{footer}
</body>
</html>"#,
        title = esc(&title),
        description = esc(&meta.description),
        canonical = esc(&format!("{}{}", chrome.base_url, meta.path)),
        header = header(chrome),
        body = body,
        footer = footer(chrome),
    )
}

pub fn banners(items: &[banner::Model]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<section class="banners">"#);
    for item in items {
        let mobile = item.imagem_mobile.as_deref().unwrap_or(&item.imagem);
        let image = format!(
            r#"<picture><source media="(max-width: 640px)" srcset="{}"><img src="{}" alt="{}"></picture>"#,
            esc(mobile),
            esc(&item.imagem),
            esc(&item.titulo)
        );
        match item.link.as_deref().and_then(safe_url) {
            Some(link) => {
                let _ = write!(out, r#"<a href="{}">{}</a>"#, esc(link), image);
            }
            None => out.push_str(&image),
        }
    }
    out.push_str("</section>");
    out
}

pub fn slides(items: &[slide::Model]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<section class="slides">"#);
    for item in items {
        let _ = write!(
            out,
            r#"<article class="slide"><img src="{}" alt="{}"><h2>{}</h2>"#,
            esc(&item.imagem),
            esc(&item.titulo),
            esc(&item.titulo)
        );
        if let Some(subtitulo) = &item.subtitulo {
            let _ = write!(out, "<h3>{}</h3>", esc(subtitulo));
        }
        if let Some(descricao) = &item.descricao {
            out.push_str(&text_paragraphs(descricao));
        }
        if let Some(link) = item.link.as_deref().and_then(safe_url) {
            let _ = write!(
                out,
                r#"<a class="button" href="{}">{}</a>"#,
                esc(link),
                esc(item.texto_botao.as_deref().unwrap_or("Saiba mais"))
            );
        }
        out.push_str("</article>");
    }
    out.push_str("</section>");
    out
}

pub fn chamadas(items: &[chamada::Model]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<section class="chamadas">"#);
    for item in items {
        out.push_str(r#"<article class="chamada">"#);
        if let Some(imagem) = &item.imagem {
            let _ = write!(out, r#"<img src="{}" alt="">"#, esc(imagem));
        }
        let _ = write!(out, "<h3>{}</h3>", esc(&item.titulo));
        if let Some(subtitulo) = &item.subtitulo {
            let _ = write!(out, "<h4>{}</h4>", esc(subtitulo));
        }
        if let Some(conteudo) = &item.conteudo {
            out.push_str(&text_paragraphs(conteudo));
        }
        if let Some(link) = item.link.as_deref().and_then(safe_url) {
            let _ = write!(out, r#"<a href="{}">Saiba mais</a>"#, esc(link));
        }
        out.push_str("</article>");
    }
    out.push_str("</section>");
    out
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        esc(value),
        if selected { " selected" } else { "" },
        esc(label)
    )
}

/// Search box; list values are joined with the filter's separator
pub fn search_form(filter: &SearchFilter, categories: &Categories, cities: &[City]) -> String {
    let mut out = String::from(r#"<form class="search" method="get" action="/busca">"#);

    out.push_str(r#"<select name="acao">"#);
    for action in [Action::Comprar, Action::Alugar] {
        let label = match action {
            Action::Comprar => "Comprar",
            Action::Alugar => "Alugar",
        };
        out.push_str(&option(action.as_str(), label, filter.acao == action));
    }
    out.push_str("</select>");

    let tipos = match filter.modality() {
        Modality::Venda => &categories.venda,
        Modality::Aluguel => &categories.aluguel,
    };
    out.push_str(r#"<select name="tipos"><option value="">Todos os tipos</option>"#);
    for tipo in tipos {
        out.push_str(&option(tipo, tipo, filter.tipos.contains(tipo)));
    }
    out.push_str("</select>");

    out.push_str(r#"<select name="cidade">"#);
    let mut listed = false;
    for city in cities {
        let selected = city.nome == filter.cidade;
        listed |= selected;
        out.push_str(&option(&city.nome, &city.nome, selected));
    }
    if !listed {
        out.push_str(&option(&filter.cidade, &filter.cidade, true));
    }
    out.push_str("</select>");

    if let Some(city) = cities.iter().find(|c| c.nome == filter.cidade) {
        out.push_str(r#"<select name="bairros"><option value="">Todos os bairros</option>"#);
        for bairro in &city.bairros {
            out.push_str(&option(bairro, bairro, filter.bairros.contains(bairro)));
        }
        out.push_str("</select>");
    }

    for (name, placeholder, value) in [
        ("valorMin", "Valor mínimo", &filter.valor_min),
        ("valorMax", "Valor máximo", &filter.valor_max),
        ("dormitorios", "Dormitórios", &filter.dormitorios),
        ("vagas", "Vagas", &filter.vagas),
        ("codigo", "Código", &filter.codigo),
    ] {
        let _ = write!(
            out,
            r#"<input name="{}" placeholder="{}" value="{}">"#,
            name,
            esc(placeholder),
            esc(value)
        );
    }

    out.push_str(r#"<select name="ordem">"#);
    for key in SortKey::ALL {
        out.push_str(&option(key.as_str(), key.label(), filter.ordem == key));
    }
    out.push_str(r#"</select><button type="submit">Buscar</button></form>"#);
    out
}

/// Result card linking to the detail page
pub fn listing_card(listing: &Listing, modality: Modality) -> String {
    let title = listing_title(listing);
    let mut out = format!(
        r#"<article class="listing-card"><a href="/imovel/{}">"#,
        esc(&listing.codigo)
    );
    if let Some(photo) = listing.cover_photo() {
        let _ = write!(out, r#"<img src="{}" alt="{}" loading="lazy">"#, esc(photo), esc(&title));
    }
    let _ = write!(out, "<h3>{}</h3>", esc(&title));

    let place = [listing.bairro.as_deref(), listing.cidade.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    if !place.is_empty() {
        let _ = write!(out, r#"<p class="place">{}</p>"#, esc(&place));
    }

    let mut facts = Vec::new();
    if let Some(n) = listing.dormitorios.filter(|n| *n > 0) {
        facts.push(count_label(n, "dormitório", "dormitórios"));
    }
    if let Some(n) = listing.suites.filter(|n| *n > 0) {
        facts.push(count_label(n, "suíte", "suítes"));
    }
    if let Some(n) = listing.vagas.filter(|n| *n > 0) {
        facts.push(count_label(n, "vaga", "vagas"));
    }
    if let Some(a) = listing.area_privativa.filter(|a| *a > 0.0) {
        facts.push(area(a));
    }
    if !facts.is_empty() {
        let _ = write!(out, r#"<p class="facts">{}</p>"#, esc(&facts.join(" · ")));
    }

    let _ = write!(
        out,
        r#"<p class="price">{}</p><span class="code">Cód. {}</span></a></article>"#,
        esc(&price_label(listing.price(modality))),
        esc(&listing.codigo)
    );
    out
}

pub fn listing_grid(listings: &[Listing], modality: Modality) -> String {
    if listings.is_empty() {
        return r#"<p class="empty">Nenhum imóvel encontrado com esses filtros.</p>"#.to_string();
    }
    let cards: String = listings.iter().map(|l| listing_card(l, modality)).collect();
    format!(r#"<section class="listing-grid">{}</section>"#, cards)
}

/// Page links around the current page, keeping the rest of the filter
pub fn pagination(filter: &SearchFilter, total_pages: u32) -> String {
    if total_pages <= 1 {
        return String::new();
    }
    let current = filter.pagina.min(total_pages);
    let link = |page: u32, label: &str| {
        format!(
            r#"<a href="/busca?{}">{}</a>"#,
            esc(&filter.to_query_string(page)),
            esc(label)
        )
    };

    let mut out = String::from(r#"<nav class="pagination">"#);
    if current > 1 {
        out.push_str(&link(current - 1, "Anterior"));
    }
    for page in page_window(current, total_pages, PAGINATION_WIDTH) {
        if page == current {
            let _ = write!(out, r#"<span aria-current="page">{}</span>"#, page);
        } else {
            out.push_str(&link(page, &page.to_string()));
        }
    }
    if current < total_pages {
        out.push_str(&link(current + 1, "Próxima"));
    }
    out.push_str("</nav>");
    out
}

/// Lead form posting to the public form endpoint
pub fn lead_form(kind: FormKind, codigo: Option<&str>, return_path: &str) -> String {
    let mut out = format!(
        r#"<form class="lead" method="post" action="/api/formularios/{}">"#,
        kind.as_str()
    );
    let _ = write!(out, r#"<input type="hidden" name="url" value="{}">"#, esc(return_path));
    if let Some(codigo) = codigo {
        let _ = write!(
            out,
            r#"<input type="hidden" name="codigoImovel" value="{}">"#,
            esc(codigo)
        );
    }
    out.push_str(
        r#"<input name="nome" placeholder="Nome" required><input name="email" type="email" placeholder="E-mail" required><input name="telefone" placeholder="Telefone" required><textarea name="mensagem" placeholder="Mensagem" required></textarea><button type="submit">Enviar</button></form>"#,
    );
    out
}

/// Detail page body without the similar listings
pub fn listing_detail(listing: &Listing, modality: Modality, sent: bool) -> String {
    let title = listing_title(listing);
    let mut out = format!(r#"<article class="listing"><h1>{}</h1>"#, esc(&title));

    let _ = write!(out, r#"<p class="code">Código {}</p>"#, esc(&listing.codigo));
    if let Some(endereco) = &listing.endereco {
        let _ = write!(out, "<address>{}</address>", esc(endereco));
    }

    out.push_str(r#"<section class="gallery">"#);
    let photos = listing
        .fotos
        .iter()
        .filter_map(|p| p.foto.as_deref())
        .collect::<Vec<_>>();
    if photos.is_empty() {
        if let Some(cover) = listing.cover_photo() {
            let _ = write!(out, r#"<img src="{}" alt="{}">"#, esc(cover), esc(&title));
        }
    } else {
        for photo in photos {
            let _ = write!(out, r#"<img src="{}" alt="{}" loading="lazy">"#, esc(photo), esc(&title));
        }
    }
    out.push_str("</section>");

    let mut facts = Vec::new();
    if let Some(n) = listing.dormitorios {
        facts.push(count_label(n, "dormitório", "dormitórios"));
    }
    if let Some(n) = listing.suites {
        facts.push(count_label(n, "suíte", "suítes"));
    }
    if let Some(n) = listing.vagas {
        facts.push(count_label(n, "vaga", "vagas"));
    }
    if let Some(a) = listing.area_privativa {
        facts.push(format!("{} privativos", area(a)));
    }
    if let Some(a) = listing.area_total {
        facts.push(format!("{} totais", area(a)));
    }
    out.push_str(r#"<ul class="facts">"#);
    for fact in facts {
        let _ = write!(out, "<li>{}</li>", esc(&fact));
    }
    out.push_str("</ul>");

    let _ = write!(
        out,
        r#"<p class="price">{}</p>"#,
        esc(&price_label(listing.price(modality)))
    );
    if let Some(descricao) = &listing.descricao_web {
        out.push_str(&text_paragraphs(descricao));
    }

    out.push_str(r#"<aside class="contact"><h2>Quero mais informações</h2>"#);
    if sent {
        out.push_str(r#"<p class="sent">Recebemos sua mensagem. Em breve entraremos em contato.</p>"#);
    }
    out.push_str(&lead_form(
        FormKind::Informacao,
        Some(&listing.codigo),
        &format!("/imovel/{}", listing.codigo),
    ));
    out.push_str("</aside></article>");
    out
}

pub fn similar_section(listings: &[Listing], modality: Modality) -> String {
    if listings.is_empty() {
        return String::new();
    }
    format!(
        r#"<section class="similar"><h2>Imóveis semelhantes</h2>{}</section>"#,
        listing_grid(listings, modality)
    )
}

pub fn content_page(page: &content_page::Model) -> String {
    let mut out = format!("<article class=\"content-page\"><h1>{}</h1>", esc(&page.titulo));
    if let Some(subtitulo) = &page.subtitulo {
        let _ = write!(out, "<h2>{}</h2>", esc(subtitulo));
    }
    if let Some(imagem) = &page.imagem {
        let _ = write!(out, r#"<img src="{}" alt="">"#, esc(imagem));
    }
    out.push_str(&text_paragraphs(&page.conteudo));
    out.push_str("</article>");
    out
}

pub fn brokers(items: &[broker::Model]) -> String {
    let mut out = String::from(r#"<h1>Nossos corretores</h1><section class="brokers">"#);
    for item in items {
        out.push_str(r#"<article class="broker">"#);
        if let Some(foto) = &item.foto {
            let _ = write!(out, r#"<img src="{}" alt="{}">"#, esc(foto), esc(&item.nome));
        }
        let _ = write!(
            out,
            r#"<h3>{}</h3><p>CRECI {}</p><a href="tel:{}">{}</a> <a href="mailto:{}">{}</a></article>"#,
            esc(&item.nome),
            esc(&item.creci),
            esc(&imobi_common::utils::digits_only(&item.telefone)),
            esc(&item.telefone),
            esc(&item.email),
            esc(&item.email)
        );
    }
    out.push_str("</section>");
    out
}

pub fn error_body(status: u16) -> String {
    let (title, text) = match status {
        404 => (
            "Página não encontrada",
            "O endereço que você procurou não existe ou o imóvel não está mais disponível.",
        ),
        502 => (
            "Serviço indisponível",
            "Não conseguimos consultar os imóveis agora. Tente novamente em instantes.",
        ),
        _ => ("Algo deu errado", "Tente novamente em instantes."),
    };
    format!(
        r#"<section class="error"><h1>{}</h1><p>{}</p><a href="/">Voltar para o início</a></section>"#,
        esc(title),
        esc(text)
    )
}
