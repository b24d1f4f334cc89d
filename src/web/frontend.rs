//! Embedded HTML/CSS/JS frontend for the claridian dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. All layout
//! numbers (gauge color, timeline offsets) come from the API; the page
//! only places what it is given.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>CLARIDIAN Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 24px; font-weight: 600; }
header .sub { color: var(--text-muted); font-size: 13px; }

.grid { display: grid; grid-template-columns: 380px 1fr; gap: 16px; }
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
  margin-bottom: 16px;
}
.card h2 { font-size: 15px; margin-bottom: 12px; }

button {
  background: var(--border);
  color: var(--text);
  border: none;
  border-radius: 6px;
  padding: 6px 14px;
  cursor: pointer;
  font-size: 13px;
}
button.primary { background: var(--accent); color: #0d1117; font-weight: 600; }
button:disabled { opacity: 0.4; cursor: not-allowed; }

.method-toggle { display: flex; gap: 8px; margin-bottom: 12px; }
.method-toggle button.active { background: var(--accent); color: #0d1117; }

.panel-nav { display: flex; align-items: center; justify-content: space-between; margin-bottom: 8px; }
.panel-nav .title { font-weight: 600; }

.slider { margin: 10px 0; }
.slider label { display: flex; justify-content: space-between; font-size: 13px; }
.slider input[type=range] {
  width: 100%; height: 6px; margin: 8px 0; border-radius: 3px;
  -webkit-appearance: none; appearance: none; accent-color: var(--accent);
  background: linear-gradient(to right, var(--accent) var(--range-progress, 0%),
    var(--border) var(--range-progress, 0%));
}
.slider input[type=range]::-webkit-slider-thumb {
  -webkit-appearance: none; width: 14px; height: 14px; border-radius: 50%; background: var(--text);
}
.slider input[type=range]::-moz-range-thumb {
  width: 14px; height: 14px; border: none; border-radius: 50%; background: var(--text);
}

textarea {
  width: 100%;
  min-height: 120px;
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 8px;
  font-family: var(--font);
}
.hint { color: var(--text-muted); font-size: 12px; margin-top: 4px; }
.error { color: var(--red); margin-top: 8px; min-height: 1.5em; }

.gauge { text-align: center; }
.gauge .ring {
  width: 160px; height: 160px; margin: 0 auto 8px;
  border-radius: 50%;
  display: flex; align-items: center; justify-content: center;
  font-size: 32px; font-weight: 700;
}
.gauge .label { font-weight: 600; }

.primary-role { --role: var(--accent); }
.risk-low { --role: var(--green); }
.risk-moderate { --role: var(--yellow); }
.risk-high { --role: var(--red); }

.low-risk-text { color: var(--green); }
.moderate-risk-text { color: var(--yellow); }
.high-risk-text { color: var(--red); }

ul.rules { padding-left: 18px; }
ul.rules li { margin: 4px 0; }

.timeline-scroll { overflow-x: auto; border: 1px solid var(--border); border-radius: 6px; }
.timeline { position: relative; height: 170px; }
.timeline .tick {
  position: absolute; bottom: 0; height: 24px;
  border-left: 1px solid var(--border);
  color: var(--text-muted); font-size: 11px; padding-left: 4px;
}
.timeline .item {
  position: absolute; height: 56px;
  border-radius: 6px; padding: 6px; font-size: 12px;
  background: var(--border); border-left: 4px solid var(--text-muted);
}
.timeline .item .time { color: var(--text-muted); font-size: 11px; }
.timeline-item-low { border-left-color: var(--green) !important; }
.timeline-item-mod { border-left-color: var(--yellow) !important; }
.timeline-item-high { border-left-color: var(--red) !important; }
.timeline-item-default { border-left-color: var(--accent) !important; }
.timeline-empty { color: var(--text-muted); padding: 16px; }
</style>
</head>
<body>
<div class="app">
  <header>
    <div>
      <h1>CLARIDIAN</h1>
      <div class="sub">Psychosis risk assessment dashboard</div>
    </div>
    <button id="report-btn">Download Report</button>
  </header>

  <div class="grid">
    <div>
      <div class="card">
        <div class="method-toggle">
          <button data-method="slider">Sliders</button>
          <button data-method="text">Clinician Note</button>
        </div>

        <div id="slider-area">
          <div class="panel-nav">
            <button id="prev-btn">&larr;</button>
            <span class="title" id="panel-title"></span>
            <button id="next-btn">&rarr;</button>
          </div>
          <div id="sliders"></div>
          <button class="primary" id="assess-sliders">Assess Metrics</button>
        </div>

        <div id="text-area" hidden>
          <textarea id="note" placeholder="Paste or type clinician notes..."></textarea>
          <div class="hint">Notes longer than 50 characters are scored with the high-risk profile.</div>
          <button class="primary" id="assess-text" style="margin-top:8px">Assess Text</button>
        </div>

        <div class="error" id="error"></div>
      </div>
    </div>

    <div>
      <div class="card gauge">
        <div class="ring" id="gauge-ring"></div>
        <div class="label" id="gauge-label"></div>
        <div class="hint" id="interpretation"></div>
      </div>

      <div class="card">
        <h2>Triggered Rules</h2>
        <ul class="rules" id="rules"></ul>
      </div>

      <div class="card">
        <h2>Action Plan</h2>
        <div id="action-plan" class="hint">Run an assessment to see the next step.</div>
      </div>
    </div>
  </div>

  <div class="card">
    <h2>Daily Care Plan</h2>
    <div class="timeline-scroll"><div class="timeline" id="timeline"></div></div>
  </div>
</div>

<script>
const $ = (id) => document.getElementById(id);
let state = null;

async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body !== undefined) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const resp = await fetch(path, opts);
  const data = await resp.json();
  if (!resp.ok) throw new Error(data.error || ('HTTP ' + resp.status));
  return data;
}

function render(s) {
  state = s;
  for (const b of document.querySelectorAll('[data-method]')) {
    b.classList.toggle('active', b.dataset.method === s.method);
  }
  $('slider-area').hidden = s.method !== 'slider';
  $('text-area').hidden = s.method !== 'text';

  const nav = s.navigator;
  $('panel-title').textContent = nav.title;
  $('prev-btn').disabled = !nav.prev_enabled;
  $('next-btn').disabled = !nav.next_enabled;

  const visible = new Set(nav.fields);
  $('sliders').innerHTML = '';
  for (const sl of s.sliders.filter((x) => visible.has(x.field))) {
    const div = document.createElement('div');
    div.className = 'slider';
    div.innerHTML =
      `<label><span>${sl.label}</span><span>${sl.display}</span></label>` +
      `<input type="range" min="${sl.min}" max="${sl.max}" step="${sl.step}" value="${sl.value}">`;
    const input = div.querySelector('input');
    input.style.setProperty('--range-progress', `${sl.progress_pct}%`);
    input.addEventListener('input', () => {
      const v = Number(input.value);
      div.querySelector('label span:last-child').textContent = String(v);
      input.style.setProperty('--range-progress', `${((v - sl.min) / (sl.max - sl.min)) * 100}%`);
    });
    input.addEventListener('change', () => updateMetric(sl.field, Number(input.value)));
    $('sliders').appendChild(div);
  }

  $('assess-sliders').disabled = !s.trigger_enabled;
  $('assess-text').disabled = !s.trigger_enabled;
  renderDashboard(s.dashboard);
}

function renderDashboard(d) {
  const ring = $('gauge-ring');
  ring.className = 'ring ' + (d.gauge.color_role === 'primary' ? 'primary-role' : d.gauge.color_role);
  const pct = Math.max(0, Math.min(100, d.gauge.value));
  ring.style.background =
    `radial-gradient(var(--surface) 58%, transparent 59%), ` +
    `conic-gradient(var(--role) ${pct}%, var(--border) ${pct}% 100%)`;
  ring.textContent = Math.round(d.gauge.value) + '%';
  $('gauge-label').textContent = d.gauge.label;
  $('interpretation').textContent = d.interpretation || '';

  const rules = $('rules');
  rules.innerHTML = '';
  for (const r of d.triggered_rules) {
    const li = document.createElement('li');
    li.textContent = r;
    rules.appendChild(li);
  }

  const plan = $('action-plan');
  if (d.action_plan) {
    plan.className = d.action_plan.style_class;
    plan.textContent = d.action_plan.message;
  }

  renderTimeline(d.timeline);
}

function renderTimeline(t) {
  const el = $('timeline');
  el.innerHTML = '';
  el.style.width = t.width_px + 'px';
  for (const tick of t.ticks) {
    const div = document.createElement('div');
    div.className = 'tick';
    div.style.left = tick.x_offset_px + 'px';
    div.textContent = tick.label;
    el.appendChild(div);
  }
  if (t.items.length === 0) {
    const empty = document.createElement('div');
    empty.className = 'timeline-empty';
    empty.textContent = 'No plan yet. Run an assessment to generate one.';
    el.appendChild(empty);
  }
  for (const item of t.items) {
    const div = document.createElement('div');
    div.className = 'item ' + item.style_class;
    div.style.left = item.x_offset_px + 'px';
    div.style.top = item.top_px + 'px';
    div.style.width = item.width_px + 'px';
    div.innerHTML = `<div class="time">${item.start_label}</div><div></div>`;
    div.lastChild.textContent = item.label;
    el.appendChild(div);
  }
}

function showError(msg) { $('error').textContent = msg || ''; }

async function refresh() {
  try { render(await api('GET', '/api/session')); } catch (e) { showError(e.message); }
}

async function updateMetric(field, value) {
  try { render(await api('PUT', '/api/metrics', { field, value })); } catch (e) { showError(e.message); }
}

async function assess(body) {
  showError('');
  $('assess-sliders').disabled = true;
  $('assess-text').disabled = true;
  try {
    const data = await api('POST', '/api/assess', body);
    render(data.session);
  } catch (e) {
    showError(e.message);
    await refresh();
  }
}

async function downloadReport() {
  const resp = await fetch('/api/report');
  if (!resp.ok) {
    const data = await resp.json();
    alert(data.error);
    return;
  }
  const disposition = resp.headers.get('Content-Disposition') || '';
  const match = disposition.match(/filename="([^"]+)"/);
  const blob = await resp.blob();
  const a = document.createElement('a');
  a.href = URL.createObjectURL(blob);
  a.download = match ? match[1] : 'CLARIDIAN_Report.txt';
  a.click();
  URL.revokeObjectURL(a.href);
}

for (const b of document.querySelectorAll('[data-method]')) {
  b.addEventListener('click', async () => {
    try { render(await api('POST', '/api/method', { method: b.dataset.method })); }
    catch (e) { showError(e.message); }
  });
}
$('prev-btn').addEventListener('click', async () => render(await api('POST', '/api/navigate', { direction: 'prev' })));
$('next-btn').addEventListener('click', async () => render(await api('POST', '/api/navigate', { direction: 'next' })));
$('assess-sliders').addEventListener('click', () => assess({ source: 'sliders' }));
$('assess-text').addEventListener('click', () => assess({ source: 'text', text: $('note').value }));
$('report-btn').addEventListener('click', downloadReport);

refresh();
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_uses_every_api_route() {
        for route in [
            "/api/session",
            "/api/navigate",
            "/api/method",
            "/api/metrics",
            "/api/assess",
            "/api/report",
        ] {
            assert!(INDEX_HTML.contains(route), "missing {route}");
        }
    }

    #[test]
    fn timeline_classes_have_styles() {
        for class in [
            "timeline-item-low",
            "timeline-item-mod",
            "timeline-item-high",
            "timeline-item-default",
        ] {
            assert!(INDEX_HTML.contains(&format!(".{class}")), "missing {class}");
        }
    }

    #[test]
    fn slider_label_and_fill_follow_the_value() {
        // Live label matches the server's display ("7", not "7.0").
        assert!(!INDEX_HTML.contains("toFixed("));
        assert!(INDEX_HTML.contains("textContent = String(v)"));
        // Fill is seeded from the server and recomputed while dragging.
        assert!(INDEX_HTML.contains("`${sl.progress_pct}%`"));
        assert!(INDEX_HTML.contains("((v - sl.min) / (sl.max - sl.min)) * 100"));
        assert!(INDEX_HTML.contains("var(--range-progress, 0%)"));
    }
}
