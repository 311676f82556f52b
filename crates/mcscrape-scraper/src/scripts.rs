//! In-page functions evaluated through [`BrowserPage::query`](crate::page::BrowserPage::query).
//!
//! Each script is a single-argument arrow function receiving a JSON object.
//! Results are plain JSON; all defaulting happens on the Rust side.

use crate::page::PageQuery;

/// First non-empty, whitespace-collapsed text among `args.selectors`, or `null`.
pub const FIRST_TEXT: PageQuery = PageQuery {
    name: "first_text",
    script: r"(args) => {
        for (const sel of args.selectors) {
            const el = document.querySelector(sel);
            const text = el ? el.textContent.replace(/\s+/g, ' ').trim() : '';
            if (text) return text;
        }
        return null;
    }",
};

/// `href` of the first organic search result title, or `null`.
pub const SEARCH_RESULT_LINK: PageQuery = PageQuery {
    name: "search_result_link",
    script: r#"(args) => {
        const first = document.querySelector(args.results);
        const link = first ? first.querySelector('a[data-testid="result-title-a"]') : null;
        return link ? link.href : null;
    }"#,
};

/// `{title, summary}` of one SWOT tile, or `null` when the tile is missing.
pub const SWOT_TILE: PageQuery = PageQuery {
    name: "swot_tile",
    script: r"(args) => {
        const tile = document.querySelector(args.tile);
        if (!tile) return null;
        const text = (sel) => {
            const el = tile.querySelector(sel);
            return el ? el.textContent.trim() : '';
        };
        return { title: text('strong'), summary: text('em') };
    }",
};

/// Non-empty `li` texts inside `args.container`.
pub const LIST_ITEMS: PageQuery = PageQuery {
    name: "list_items",
    script: r"(args) => {
        const root = document.querySelector(args.container);
        if (!root) return [];
        return Array.from(root.querySelectorAll('li'))
            .map((li) => li.textContent.trim())
            .filter((text) => text.length > 0);
    }",
};

/// Essentials checklist rows: the row's leading text node and whether the
/// green checkmark path is drawn inside its icon span.
pub const CHECKLIST_ROWS: PageQuery = PageQuery {
    name: "checklist_rows",
    script: r#"(args) => {
        return Array.from(document.querySelectorAll(args.rows)).map((row) => {
            const first = row.childNodes[0];
            const icon = row.querySelector('span');
            return {
                text: first ? first.textContent.trim() : '',
                check_marker: icon ? icon.querySelector('svg path[style*="3BB54A"]') !== null : false,
            };
        });
    }"#,
};

/// Raw Financial Insights: Piotroski block, CAGR pairs and classed rows.
pub const INSIGHTS: PageQuery = PageQuery {
    name: "insights",
    script: r#"(args) => {
        const boxes = Array.from(document.querySelectorAll(args.boxes));
        const byAnchor = (href) => boxes.find((box) => box.querySelector(`a[href="${href}"]`));
        const text = (root, sel) => {
            const el = root ? root.querySelector(sel) : null;
            return el ? el.textContent.trim() : null;
        };
        const rows = (root) => root
            ? Array.from(root.querySelectorAll('li')).map((li) => ({
                text: li.textContent.replace(/\s+/g, ' ').trim(),
                class: li.className || '',
            })).filter((r) => r.text.length > 0)
            : [];

        const financials = byAnchor('#financials');
        const pio = financials ? financials.querySelector('.fpioi') : null;
        const cagr = [];
        const table = financials ? financials.querySelector('.frevdat') : null;
        if (table) {
            table.querySelectorAll('tr').forEach((tr) => {
                const cells = tr.querySelectorAll('td');
                if (cells.length === 2) cagr.push([cells[0].textContent.trim(), cells[1].textContent.trim()]);
            });
        }
        return {
            piotroski_score: text(pio, '.nof'),
            piotroski_indicates: text(pio, 'p'),
            cagr,
            price: rows(boxes[0]),
            industry: rows(byAnchor('#peers')),
        };
    }"#,
};

/// Up to `args.limit` news entries with nullable title, url and time.
pub const NEWS_LIST: PageQuery = PageQuery {
    name: "news_list",
    script: r"(args) => {
        return Array.from(document.querySelectorAll(args.items)).slice(0, args.limit).map((item) => {
            const title = item.querySelector('h3 a');
            const link = item.querySelector('a');
            const time = item.querySelector('.datetime');
            return {
                title: title ? title.textContent.trim() : null,
                url: link ? link.href : null,
                time: time ? time.textContent.trim() : null,
            };
        });
    }",
};

/// Trimmed article lede text, or `null` when the element is missing.
pub const ARTICLE_TEXT: PageQuery = PageQuery {
    name: "article_text",
    script: r"(args) => {
        const el = document.querySelector(args.selector);
        return el ? el.textContent.trim() : null;
    }",
};
