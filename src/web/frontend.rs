//! Embedded HTML/CSS/JS frontend for the promptlens dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>promptlens</title>
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
  --purple: #bc8cff;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 1100px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 22px; font-weight: 600; display: flex; align-items: center; gap: 10px; }
header h1 .logo { color: var(--accent); font-family: var(--mono); font-weight: 700; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.health-badges { display: flex; gap: 8px; }
.badge {
  display: inline-flex;
  align-items: center;
  gap: 4px;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 500;
  background: var(--surface);
  border: 1px solid var(--border);
}
.badge.ok { border-color: var(--green); color: var(--green); }
.badge.err { border-color: var(--red); color: var(--red); }

/* Cards */
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
  margin-bottom: 16px;
}
.card h2 { font-size: 14px; font-weight: 600; margin-bottom: 12px; color: var(--text); }

/* Submit form */
.form-row { display: flex; gap: 12px; margin-bottom: 12px; }
.field { flex: 1; display: flex; flex-direction: column; gap: 4px; }
.field label { font-size: 12px; color: var(--text-muted); }
textarea, input[type=text] {
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 8px 10px;
  font-family: var(--font);
  font-size: 13px;
}
textarea { min-height: 64px; resize: vertical; }
textarea:focus, input:focus { outline: none; border-color: var(--accent); }

button.primary {
  background: var(--accent);
  color: #0d1117;
  border: none;
  border-radius: 6px;
  padding: 8px 20px;
  font-size: 13px;
  font-weight: 600;
  cursor: pointer;
}
button.primary:hover { opacity: 0.9; }
button.primary:disabled { opacity: 0.5; cursor: wait; }

.response-box {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 10px;
  min-height: 72px;
  white-space: pre-wrap;
  font-size: 13px;
  color: var(--text);
}
.latency-line { margin-top: 8px; color: var(--text-muted); font-size: 12px; }
.latency-line .mono { font-family: var(--mono); color: var(--text); }

/* Feedback controls */
.feedback-row { display: flex; align-items: center; gap: 16px; flex-wrap: wrap; }
button.thumb {
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 6px 16px;
  font-size: 13px;
  cursor: pointer;
}
button.thumb.up.selected { border-color: var(--green); color: var(--green); }
button.thumb.down.selected { border-color: var(--red); color: var(--red); }
.check { display: flex; align-items: center; gap: 6px; color: var(--text-muted); font-size: 13px; }

/* Stat tiles */
.tiles { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; margin-bottom: 16px; }
.tile {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 14px;
}
.tile .value { font-size: 22px; font-weight: 600; font-family: var(--mono); }
.tile .label { font-size: 12px; color: var(--text-muted); }

/* Charts */
.charts { display: grid; grid-template-columns: 1fr 1fr 1.4fr; gap: 12px; }
.chart-panel {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 14px;
}
.chart-panel h3 { font-size: 13px; font-weight: 600; margin-bottom: 10px; }
.chart-annotation { font-size: 12px; color: var(--text-muted); margin-top: 8px; }

.bars { display: flex; align-items: flex-end; gap: 18px; height: 120px; padding: 0 8px; }
.bar-group { flex: 1; display: flex; flex-direction: column; align-items: center; height: 100%; justify-content: flex-end; }
.vbar { width: 100%; max-width: 56px; border-radius: 4px 4px 0 0; min-height: 2px; }
.vbar.green { background: var(--green); }
.vbar.red { background: var(--red); }
.vbar.purple { background: var(--purple); }
.bar-count { font-family: var(--mono); font-size: 12px; margin-bottom: 4px; }
.bar-label { font-size: 11px; color: var(--text-muted); margin-top: 6px; }

.empty { color: var(--text-muted); font-size: 12px; padding: 24px 0; text-align: center; }

svg.latency { width: 100%; height: 140px; }

/* Log table */
table { width: 100%; border-collapse: collapse; font-size: 12px; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid var(--border); }
th { color: var(--text-muted); font-weight: 500; }
td.mono { font-family: var(--mono); }
td.num { text-align: right; font-family: var(--mono); }
tr:hover td { background: rgba(255,255,255,0.02); }

/* Toast */
.toast {
  position: fixed;
  bottom: 20px;
  right: 20px;
  background: var(--surface);
  border: 1px solid var(--green);
  color: var(--text);
  border-radius: 6px;
  padding: 10px 16px;
  font-size: 13px;
  opacity: 0;
  transition: opacity 0.2s;
  pointer-events: none;
}
.toast.show { opacity: 1; }
.toast.error { border-color: var(--red); }
</style>
</head>
<body>
<div class="app">
  <header>
    <div>
      <h1><span class="logo">promptlens</span> Prompt Evaluation Dashboard</h1>
      <div class="subtitle">Test LLM responses, rate them, and watch the metrics move.</div>
    </div>
    <div class="health-badges" id="badges"></div>
  </header>

  <!-- Submit -->
  <div class="card">
    <h2>Submit a prompt</h2>
    <div class="form-row">
      <div class="field" style="flex: 2">
        <label for="prompt">Prompt</label>
        <textarea id="prompt" placeholder="Enter your prompt here..."></textarea>
      </div>
      <div class="field">
        <label for="template">Prompt template</label>
        <input type="text" id="template" value="Default">
        <label for="model" style="margin-top: 8px">Model version</label>
        <input type="text" id="model">
      </div>
    </div>
    <button class="primary" id="submit-btn">Submit</button>
  </div>

  <!-- Response + feedback -->
  <div class="card">
    <h2>Response</h2>
    <div class="response-box" id="response"></div>
    <div class="latency-line">Latency: <span class="mono" id="latency">&ndash;</span></div>
    <div class="feedback-row" style="margin-top: 12px">
      <button class="thumb up" id="thumb-up">&#128077; Good</button>
      <button class="thumb down" id="thumb-down">&#128078; Bad</button>
      <label class="check">
        <input type="checkbox" id="hallucination"> Hallucination detected?
      </label>
      <button class="primary" id="feedback-btn" disabled>Send feedback</button>
    </div>
  </div>

  <!-- Stat tiles -->
  <div class="tiles">
    <div class="tile"><div class="value" id="stat-total">&ndash;</div><div class="label">Total requests</div></div>
    <div class="tile"><div class="value" id="stat-satisfaction">&ndash;</div><div class="label">Satisfaction</div></div>
    <div class="tile"><div class="value" id="stat-latency">&ndash;</div><div class="label">Avg latency</div></div>
    <div class="tile"><div class="value" id="stat-halluc">&ndash;</div><div class="label">Hallucination rate</div></div>
  </div>

  <!-- Charts -->
  <div class="charts">
    <div class="chart-panel">
      <h3>Feedback</h3>
      <div id="feedback-chart"></div>
    </div>
    <div class="chart-panel">
      <h3>Hallucinations</h3>
      <div id="halluc-chart"></div>
    </div>
    <div class="chart-panel">
      <h3>Latency trend</h3>
      <div id="latency-chart"></div>
    </div>
  </div>

  <!-- Recent interactions -->
  <div class="card" style="margin-top: 16px">
    <h2>Recent interactions</h2>
    <table>
      <thead>
        <tr><th>Prompt</th><th>Response</th><th>Model</th><th style="text-align:right">Latency</th><th>Feedback</th></tr>
      </thead>
      <tbody id="log-tbody"></tbody>
    </table>
    <div class="empty" id="log-empty" style="display:none">No interactions logged yet.</div>
  </div>
</div>

<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let lastSubmission = null;   // {prompt, response, latency} of the latest successful submit
let selectedFeedback = null; // 'positive' | 'negative' | null

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  return res.json();
}

function toast(msg, isError) {
  const el = document.getElementById('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

function esc(s) {
  const div = document.createElement('div');
  div.textContent = s == null ? '' : String(s);
  return div.innerHTML;
}

function clip(s, max) {
  s = (s || '').replace(/\n/g, ' ');
  return s.length > max ? s.slice(0, max - 1) + '…' : s;
}

function pct(n) { return (n == null) ? '–' : n.toFixed(1) + '%'; }

// ---------------------------------------------------------------------------
// Health badges
// ---------------------------------------------------------------------------
async function loadHealth() {
  try {
    const h = await api('GET', '/api/health');
    document.getElementById('badges').innerHTML =
      `<span class="badge ${h.token_set ? 'ok' : 'err'}">${h.token_set ? 'token set' : 'HF_TOKEN missing'}</span>` +
      `<span class="badge ok">${h.total_rows} logged</span>`;
  } catch (e) { /* badges are cosmetic */ }
}

// ---------------------------------------------------------------------------
// Submit flow
// ---------------------------------------------------------------------------
document.getElementById('submit-btn').addEventListener('click', async () => {
  const btn = document.getElementById('submit-btn');
  const prompt = document.getElementById('prompt').value;
  const template = document.getElementById('template').value;
  const model = document.getElementById('model').value;

  btn.disabled = true;
  try {
    const r = await api('POST', '/api/submit', { prompt, template, model });
    document.getElementById('response').textContent = r.response;
    document.getElementById('latency').textContent = r.latency.toFixed(3) + 's';

    lastSubmission = { prompt, response: r.response, latency: r.latency };
    resetFeedbackControls();
    document.getElementById('feedback-btn').disabled = false;

    loadStats();
    loadLog();
    loadHealth();
  } catch (e) {
    toast('Submit failed: ' + e.message, true);
  } finally {
    btn.disabled = false;
  }
});

// ---------------------------------------------------------------------------
// Feedback flow
// ---------------------------------------------------------------------------
function resetFeedbackControls() {
  selectedFeedback = null;
  document.getElementById('thumb-up').classList.remove('selected');
  document.getElementById('thumb-down').classList.remove('selected');
  document.getElementById('hallucination').checked = false;
}

document.getElementById('thumb-up').addEventListener('click', () => {
  selectedFeedback = 'positive';
  document.getElementById('thumb-up').classList.add('selected');
  document.getElementById('thumb-down').classList.remove('selected');
});

document.getElementById('thumb-down').addEventListener('click', () => {
  selectedFeedback = 'negative';
  document.getElementById('thumb-down').classList.add('selected');
  document.getElementById('thumb-up').classList.remove('selected');
});

document.getElementById('feedback-btn').addEventListener('click', async () => {
  if (!lastSubmission) return;
  try {
    const bundle = await api('POST', '/api/feedback', {
      prompt: lastSubmission.prompt,
      response: lastSubmission.response,
      latency: lastSubmission.latency,
      feedback: selectedFeedback,
      hallucination: document.getElementById('hallucination').checked,
    });
    renderCharts(bundle);
    loadStats();
    loadLog();
    toast('Feedback recorded');
  } catch (e) {
    toast('Feedback failed: ' + e.message, true);
  }
});

// ---------------------------------------------------------------------------
// Stats tiles
// ---------------------------------------------------------------------------
async function loadStats() {
  try {
    const s = await api('GET', '/api/stats');
    document.getElementById('stat-total').textContent = s.total;
    document.getElementById('stat-satisfaction').textContent = pct(s.satisfaction_rate);
    document.getElementById('stat-latency').textContent = s.avg_latency.toFixed(3) + 's';
    document.getElementById('stat-halluc').textContent = pct(s.hallucination_rate);
  } catch (e) {
    toast('Failed to load stats: ' + e.message, true);
  }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------
async function loadCharts() {
  try {
    renderCharts(await api('GET', '/api/charts'));
  } catch (e) {
    toast('Failed to load charts: ' + e.message, true);
  }
}

function renderCharts(bundle) {
  renderFeedbackChart(bundle.feedback);
  renderHallucChart(bundle.hallucination);
  renderLatencyChart(bundle.latency);
}

function renderFeedbackChart(panel) {
  const el = document.getElementById('feedback-chart');
  if (!panel.bars.length) {
    el.innerHTML = '<div class="empty">No feedback yet.</div>';
    return;
  }
  const max = Math.max(...panel.bars.map(b => b.count), 1);
  el.innerHTML = '<div class="bars">' + panel.bars.map(b => `
    <div class="bar-group">
      <div class="bar-count">${b.count}</div>
      <div class="vbar ${b.color}" style="height:${(b.count / max) * 100}%"></div>
      <div class="bar-label">${esc(b.label)}</div>
    </div>
  `).join('') + '</div>';
}

function renderHallucChart(panel) {
  const el = document.getElementById('halluc-chart');
  el.innerHTML = `
    <div class="bars">
      <div class="bar-group">
        <div class="bar-count">${panel.count}</div>
        <div class="vbar purple" style="height:${panel.count > 0 ? 100 : 2}%"></div>
        <div class="bar-label">Flagged responses</div>
      </div>
    </div>
    <div class="chart-annotation">Hallucination rate: ${pct(panel.rate_pct)}</div>
  `;
}

function renderLatencyChart(panel) {
  const el = document.getElementById('latency-chart');
  const values = panel.values || [];
  if (!values.length) {
    el.innerHTML = '<div class="empty">No latency data yet.</div>';
    return;
  }

  const W = 320, H = 140, PAD = 10;
  const max = Math.max(...values, 0.001);
  const x = i => values.length === 1 ? W / 2 : PAD + (i / (values.length - 1)) * (W - 2 * PAD);
  const y = v => H - PAD - (v / max) * (H - 2 * PAD);

  const points = values.map((v, i) => `${x(i).toFixed(1)},${y(v).toFixed(1)}`).join(' ');
  const meanY = y(panel.mean).toFixed(1);

  let trendLine = '';
  if (panel.trend) {
    const y0 = y(panel.trend.intercept);
    const y1 = y(panel.trend.intercept + panel.trend.slope * (values.length - 1));
    trendLine = `<line x1="${x(0)}" y1="${y0.toFixed(1)}" x2="${x(values.length - 1)}" y2="${y1.toFixed(1)}"
      stroke="var(--yellow)" stroke-width="1.5" stroke-dasharray="6 3"/>`;
  }

  el.innerHTML = `
    <svg class="latency" viewBox="0 0 ${W} ${H}" preserveAspectRatio="none">
      <line x1="${PAD}" y1="${meanY}" x2="${W - PAD}" y2="${meanY}"
        stroke="var(--text-muted)" stroke-width="1" stroke-dasharray="2 4"/>
      ${trendLine}
      <polyline points="${points}" fill="none" stroke="var(--accent)" stroke-width="2"/>
    </svg>
    <div class="chart-annotation">Mean: ${panel.mean.toFixed(3)}s${panel.trend ? ' · dashed: OLS trend' : ''}</div>
  `;
}

// ---------------------------------------------------------------------------
// Recent interactions
// ---------------------------------------------------------------------------
async function loadLog() {
  try {
    const records = await api('GET', '/api/log?limit=25');
    const tbody = document.getElementById('log-tbody');
    const empty = document.getElementById('log-empty');

    if (!records.length) {
      tbody.innerHTML = '';
      empty.style.display = 'block';
      return;
    }
    empty.style.display = 'none';

    tbody.innerHTML = records.slice().reverse().map(r => `
      <tr>
        <td>${esc(clip(r.prompt, 40))}</td>
        <td>${esc(clip(r.response, 50))}</td>
        <td class="mono">${esc(clip(r.model_version, 28))}</td>
        <td class="num">${r.latency.toFixed(3)}s</td>
        <td>${r.user_feedback ? esc(r.user_feedback) + (r.hallucination ? ' ⚠' : '') : '–'}</td>
      </tr>
    `).join('');
  } catch (e) {
    toast('Failed to load log: ' + e.message, true);
  }
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
async function init() {
  try {
    const d = await api('GET', '/api/defaults');
    document.getElementById('model').value = d.model;
    document.getElementById('template').value = d.template;
  } catch (e) { /* keep empty fields */ }

  loadHealth();
  loadStats();
  loadCharts();
  loadLog();
}

init();
</script>
</body>
</html>
"##;
