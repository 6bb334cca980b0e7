use std::process::Command;

fn main() {
    // Rebuild CSS when templates or the Tailwind input change
    println!("cargo:rerun-if-changed=assets/css/input.css");
    println!("cargo:rerun-if-changed=templates/");

    // Try to run Tailwind CSS standalone CLI
    let status = Command::new("tailwindcss")
        .args([
            "-i",
            "assets/css/input.css",
            "-o",
            "assets/css/output.css",
            "--minify",
        ])
        .status();

    match status {
        Ok(s) if s.success() => {
            println!("cargo:warning=Tailwind CSS compiled successfully");
        }
        _ => {
            // No Tailwind CLI: write a hand-maintained subset so pages stay usable
            println!("cargo:warning=Tailwind CLI not found, using fallback CSS");
            let fallback = r#"*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: "Inter", system-ui, -apple-system, sans-serif; line-height: 1.6; color: #1c1917; background: #fafaf9; -webkit-font-smoothing: antialiased; }
.min-h-screen { min-height: 100vh; }
.mx-auto { margin-left: auto; margin-right: auto; }
.max-w-4xl { max-width: 56rem; }
.max-w-xl { max-width: 36rem; }
.max-w-md { max-width: 28rem; }
.px-4 { padding-left: 1rem; padding-right: 1rem; }
.py-3 { padding-top: 0.75rem; padding-bottom: 0.75rem; }
.py-6 { padding-top: 1.5rem; padding-bottom: 1.5rem; }
.py-8 { padding-top: 2rem; padding-bottom: 2rem; }
.py-16 { padding-top: 4rem; padding-bottom: 4rem; }
.p-6 { padding: 1.5rem; }
.mb-2 { margin-bottom: 0.5rem; }
.mb-4 { margin-bottom: 1rem; }
.mb-8 { margin-bottom: 2rem; }
.ml-2 { margin-left: 0.5rem; }
.ml-auto { margin-left: auto; }
.mt-1 { margin-top: 0.25rem; }
.mt-16 { margin-top: 4rem; }
.flex { display: flex; }
.inline-flex { display: inline-flex; }
.items-center { align-items: center; }
.justify-center { justify-content: center; }
.justify-between { justify-content: space-between; }
.gap-3 { gap: 0.75rem; }
.gap-4 { gap: 1rem; }
.text-center { text-align: center; }
.text-xs { font-size: 0.75rem; }
.text-sm { font-size: 0.875rem; }
.text-lg { font-size: 1.125rem; }
.text-xl { font-size: 1.25rem; }
.text-4xl { font-size: 2.25rem; }
.font-medium { font-weight: 500; }
.font-semibold { font-weight: 600; }
.font-bold { font-weight: 700; }
.text-white { color: #fff; }
.text-stone-400 { color: #a8a29e; }
.text-stone-500 { color: #78716c; }
.text-stone-600 { color: #57534e; }
.text-stone-700 { color: #44403c; }
.text-stone-900 { color: #1c1917; }
.bg-white { background-color: #fff; }
.bg-stone-50 { background-color: #fafaf9; }
.bg-stone-100 { background-color: #f5f5f4; }
.bg-stone-200 { background-color: #e7e5e4; }
.bg-stone-900 { background-color: #1c1917; }
.border { border: 1px solid; }
.border-b { border-bottom: 1px solid; }
.border-t { border-top: 1px solid; }
.border-stone-100 { border-color: #f5f5f4; }
.border-stone-200 { border-color: #e7e5e4; }
.border-stone-300 { border-color: #d6d3d1; }
.rounded-lg { border-radius: 0.5rem; }
.rounded-xl { border-radius: 0.75rem; }
.rounded-full { border-radius: 9999px; }
.shadow-sm { box-shadow: 0 1px 2px 0 rgb(0 0 0 / 0.05); }
.whitespace-pre-wrap { white-space: pre-wrap; }
.flex-shrink-0 { flex-shrink: 0; }
.w-6 { width: 1.5rem; }
.w-8 { width: 2rem; }
.h-6 { height: 1.5rem; }
.h-8 { height: 2rem; }
a { color: inherit; text-decoration: none; }
a:hover { opacity: 0.85; }
img { max-width: 100%; display: block; }
input, select, textarea { width: 100%; padding: 0.5rem 0.75rem; border: 1px solid #d6d3d1; border-radius: 0.5rem; font: inherit; }
.max-w-5xl { max-width: 64rem; }
.max-w-7xl { max-width: 80rem; }
.p-4 { padding: 1rem; }
.py-12 { padding-top: 3rem; padding-bottom: 3rem; }
.mb-1 { margin-bottom: 0.25rem; }
.mt-4 { margin-top: 1rem; }
.mt-8 { margin-top: 2rem; }
.gap-2 { gap: 0.5rem; }
.gap-6 { gap: 1.5rem; }
.flex-wrap { flex-wrap: wrap; }
.justify-end { justify-content: flex-end; }
.relative { position: relative; }
.block { display: block; }
.w-full { width: 100%; }
.h-16 { height: 4rem; }
.text-2xl { font-size: 1.5rem; }
.text-3xl { font-size: 1.875rem; }
.uppercase { text-transform: uppercase; }
.line-through { text-decoration: line-through; }
.text-primary { color: #ea580c; }
.text-green { color: #15803d; }
.text-stone-200 { color: #e7e5e4; }
.btn { display: inline-flex; align-items: center; justify-content: center; padding: 0.5rem 1rem; border-radius: 0.5rem; font-size: 0.875rem; font-weight: 500; cursor: pointer; border: none; }
.btn-primary { background: #ea580c; color: #fff; }
.btn-primary:hover { background: #c2410c; }
.btn-secondary { background: #fff; color: #1c1917; border: 1px solid #d6d3d1; }
.btn-secondary:hover { background: #f5f5f4; }
.btn-danger { background: #dc2626; color: #fff; }
.btn-small { padding: 0.25rem 0.5rem; font-size: 0.75rem; }
.btn-disabled, .btn:disabled { background: #d6d3d1; color: #78716c; cursor: not-allowed; }
.card { background: #fff; border-radius: 0.75rem; border: 1px solid #e7e5e4; padding: 1.5rem; box-shadow: 0 1px 2px 0 rgb(0 0 0 / 0.05); }
.pill { display: inline-block; padding: 0.25rem 0.75rem; border-radius: 9999px; font-size: 0.75rem; font-weight: 600; }
.pill-primary { background: #ffedd5; color: #c2410c; }
.pill-accent { background: #fee2e2; color: #b91c1c; }
.pill-green { background: #dcfce7; color: #15803d; }
.pill-ghost { background: #f5f5f4; color: #57534e; }
.badge { position: absolute; top: 0.75rem; left: 0.75rem; padding: 0.125rem 0.5rem; border-radius: 0.25rem; font-size: 0.75rem; font-weight: 700; color: #fff; }
.badge-sale { background: #dc2626; }
.badge-instant { background: #2563eb; left: auto; right: 0.75rem; }
.alert { border-radius: 0.5rem; padding: 0.75rem 1rem; font-size: 0.875rem; }
.alert-error { background: #fef2f2; color: #b91c1c; border: 1px solid #fecaca; }
.navbar { background: #fff; border-bottom: 1px solid #e7e5e4; position: sticky; top: 0; z-index: 10; }
.nav-links { display: flex; gap: 1.5rem; }
.logo-mark { font-weight: 800; color: #ea580c; font-size: 1.5rem; }
.dropdown { position: relative; }
.dropdown-menu { display: none; position: absolute; right: 0; background: #fff; border: 1px solid #e7e5e4; border-radius: 0.5rem; padding: 0.5rem; min-width: 12rem; }
.dropdown:hover .dropdown-menu, .dropdown:focus-within .dropdown-menu { display: block; }
.login-options form { margin-bottom: 0.25rem; }
.hero { position: relative; height: 28rem; overflow: hidden; }
.hero-image { width: 100%; height: 100%; object-fit: cover; }
.hero-overlay { position: absolute; inset: 0; background: rgb(0 0 0 / 0.45); display: flex; flex-direction: column; align-items: center; justify-content: center; color: #fff; text-align: center; }
.hero-banner { display: flex; border-radius: 0.75rem; overflow: hidden; background: #1c1917; color: #fff; }
.hero-banner-image { width: 40%; object-fit: cover; }
.hero-banner-body { padding: 2rem; }
.promo-banner { border-radius: 0.75rem; background: #7c2d12; color: #fff; padding: 2rem; }
.theme-tile { position: relative; border-radius: 0.75rem; overflow: hidden; height: 12rem; }
.theme-tile img { width: 100%; height: 100%; object-fit: cover; }
.theme-tile-label { position: absolute; bottom: 0.75rem; left: 0.75rem; color: #fff; font-weight: 700; }
.grid-4 { display: grid; grid-template-columns: repeat(auto-fill, minmax(15rem, 1fr)); gap: 1.5rem; }
.scroll-row { display: flex; gap: 1.5rem; overflow-x: auto; }
.product-card { background: #fff; border-radius: 0.75rem; border: 1px solid #e7e5e4; overflow: hidden; display: block; }
.card-image { position: relative; height: 12rem; }
.card-image img { width: 100%; height: 100%; object-fit: cover; }
.product-body { padding: 1rem; }
.stars { color: #f59e0b; }
.stars-empty { color: #d6d3d1; }
.info-bar { display: flex; flex-wrap: wrap; gap: 1rem; font-size: 0.875rem; color: #57534e; }
.perks { list-style: none; font-size: 0.875rem; }
.booking { position: sticky; top: 5rem; }
.blocks h2 { font-size: 1.5rem; font-weight: 700; margin: 1.5rem 0 0.75rem; }
.paragraph { white-space: pre-wrap; margin-bottom: 1rem; }
.paragraph-gap { height: 1rem; }
.figure { margin: 1.5rem 0; }
.figure figcaption { font-size: 0.875rem; color: #78716c; text-align: center; }
.table { width: 100%; border-collapse: collapse; }
.table th, .table td { padding: 0.75rem; border-bottom: 1px solid #e7e5e4; text-align: left; }
.thumb { width: 6rem; height: 4rem; object-fit: cover; border-radius: 0.5rem; }
.editor-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.field { display: flex; flex-direction: column; gap: 0.25rem; }
.field-wide { grid-column: span 2; }
.tab { padding: 0.5rem 1rem; border: none; border-bottom: 2px solid transparent; background: none; cursor: pointer; }
.tab-active { border-bottom-color: #ea580c; color: #ea580c; font-weight: 600; }
.insert-bar { opacity: 0.6; margin: 0.5rem 0; }
.insert-bar:hover { opacity: 1; }
.preview-frame { border: 2px dashed #fdba74; border-radius: 0.75rem; }
.preview-banner { background: #ffedd5; color: #c2410c; text-align: center; font-size: 0.75rem; font-weight: 700; padding: 0.25rem; }
.plan-summary { background: #fff7ed; border-radius: 0.75rem; padding: 1.5rem; }
.timeline { border-left: 2px solid #fdba74; padding-left: 1.5rem; }
.timeline-time { font-size: 0.75rem; font-weight: 700; color: #ea580c; }
.day-badge { display: inline-flex; align-items: center; justify-content: center; width: 2.5rem; height: 2.5rem; border-radius: 9999px; background: #ea580c; color: #fff; font-weight: 700; }
.footer { background: #1c1917; color: #a8a29e; }
.footer-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(12rem, 1fr)); gap: 2rem; }
"#;
            std::fs::create_dir_all("assets/css").ok();
            std::fs::write("assets/css/output.css", fallback).ok();
        }
    }
}
