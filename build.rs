use std::process::Command;

fn main() {
    // Only rebuild CSS when template or CSS files change
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
            // Tailwind CLI not available - create a minimal fallback CSS
            println!("cargo:warning=Tailwind CLI not found, using fallback CSS");
            let fallback = r#"*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, sans-serif; line-height: 1.6; color: #1c1917; background: #fafaf9; -webkit-font-smoothing: antialiased; }
.min-h-screen { min-height: 100vh; }
.mx-auto { margin-left: auto; margin-right: auto; }
.max-w-4xl { max-width: 56rem; }
.max-w-md { max-width: 28rem; }
.px-4 { padding-left: 1rem; padding-right: 1rem; }
.py-3 { padding-top: 0.75rem; padding-bottom: 0.75rem; }
.py-8 { padding-top: 2rem; padding-bottom: 2rem; }
.p-6 { padding: 1.5rem; }
.mb-2 { margin-bottom: 0.5rem; }
.mb-4 { margin-bottom: 1rem; }
.mb-8 { margin-bottom: 2rem; }
.mt-1 { margin-top: 0.25rem; }
.flex { display: flex; }
.items-center { align-items: center; }
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
.text-stone-500 { color: #78716c; }
.text-stone-600 { color: #57534e; }
.text-stone-900 { color: #1c1917; }
.bg-white { background-color: #fff; }
.bg-stone-50 { background-color: #fafaf9; }
.bg-stone-900 { background-color: #1c1917; }
.border { border: 1px solid; }
.border-b { border-bottom: 1px solid; }
.border-stone-200 { border-color: #e7e5e4; }
.rounded-lg { border-radius: 0.5rem; }
.rounded-xl { border-radius: 0.75rem; }
.shadow-sm { box-shadow: 0 1px 2px 0 rgb(0 0 0 / 0.05); }
.whitespace-pre-wrap { white-space: pre-wrap; }
.w-full { width: 100%; }
a { color: inherit; text-decoration: none; }
a:hover { opacity: 0.8; }
.btn { display: inline-flex; align-items: center; justify-content: center; padding: 0.5rem 1rem; border-radius: 0.5rem; font-size: 0.875rem; font-weight: 500; transition: all 0.15s; cursor: pointer; text-decoration: none; border: none; }
.btn-primary { background: #1c1917; color: #fff; }
.btn-primary:hover { background: #44403c; }
.btn-secondary { background: #fff; color: #1c1917; border: 1px solid #d6d3d1; }
.btn-secondary:hover { background: #f5f5f4; }
.btn-danger { background: #b91c1c; color: #fff; }
.card { background: #fff; border-radius: 0.75rem; border: 1px solid #e7e5e4; padding: 1.5rem; box-shadow: 0 1px 2px 0 rgb(0 0 0 / 0.05); }
.flash { padding: 0.75rem 1rem; border-radius: 0.5rem; margin-bottom: 1rem; font-size: 0.875rem; }
.flash-success { background: #ecfdf5; color: #065f46; border: 1px solid #a7f3d0; }
.flash-error { background: #fef2f2; color: #991b1b; border: 1px solid #fecaca; }
.field { display: block; width: 100%; padding: 0.5rem 0.75rem; border: 1px solid #d6d3d1; border-radius: 0.5rem; font-size: 0.875rem; margin-bottom: 1rem; background: #fff; }
table { width: 100%; border-collapse: collapse; font-size: 0.875rem; }
th, td { text-align: left; padding: 0.5rem 0.75rem; border-bottom: 1px solid #e7e5e4; }
"#;
            std::fs::create_dir_all("assets/css").ok();
            std::fs::write("assets/css/output.css", fallback).ok();
        }
    }
}
